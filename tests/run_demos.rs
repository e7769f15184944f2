/*
MIT License

Copyright (c) 2021, 2022, 2024, 2025 Vincent Hiribarren

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

use std::time::Duration;

use assert_cmd::Command;
use cargo_metadata::{MetadataCommand, TargetKind};

const TIMEOUT_DURATION: Duration = Duration::from_secs(30);

fn demo_names() -> Result<Vec<String>, anyhow::Error> {
    let metadata = MetadataCommand::new().exec()?;
    let mut names = Vec::new();
    for package in metadata.packages {
        if !metadata.workspace_members.contains(&package.id) {
            continue;
        }
        for target in package.targets {
            if target.is_kind(TargetKind::Example) {
                names.push(target.name);
            }
        }
    }
    Ok(names)
}

#[test]
fn every_chapter_is_declared() -> Result<(), anyhow::Error> {
    let mut names = demo_names()?;
    names.sort();
    assert_eq!(names, ["chapter1", "chapter2", "chapter3", "chapter4"]);
    Ok(())
}

#[test]
fn demos_dont_panic() -> Result<(), anyhow::Error> {
    for name in demo_names()? {
        let demo_under_test = escargot::CargoBuild::new().example(&name).run()?;
        Command::from_std(demo_under_test.command())
            .env("HEADLESS", "true")
            .timeout(TIMEOUT_DURATION)
            .assert()
            .success();
    }
    Ok(())
}

#[test]
fn missing_shader_is_reported() -> Result<(), anyhow::Error> {
    let demo_under_test = escargot::CargoBuild::new().example("chapter4").run()?;
    let outcome = Command::from_std(demo_under_test.command())
        .env("HEADLESS", "true")
        .env("SHADER_DIR", "/nonexistent")
        .timeout(TIMEOUT_DURATION)
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&outcome.get_output().stderr);
    assert!(stderr.contains("cube.wgsl"), "{stderr}");
    let stdout = String::from_utf8_lossy(&outcome.get_output().stdout);
    assert!(stdout.contains("Could not read shader file"), "{stdout}");
    Ok(())
}
