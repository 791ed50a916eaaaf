//! End-to-end pipeline tests.
//!
//! Execution tests need a discoverable `python3`; they skip (with a note)
//! when none is on PATH so the suite stays green on bare build hosts.

use pybox::Executor;

fn python_available() -> bool {
    if which::which("python3").is_ok() {
        return true;
    }
    eprintln!("skipping: python3 not found on PATH");
    false
}

fn executor(output: &tempfile::TempDir) -> Executor {
    Executor::new().with_output_dir(output.path())
}

#[test]
fn plain_print_succeeds_with_empty_package_lists() {
    if !python_available() {
        return;
    }
    let out = tempfile::tempdir().unwrap();
    let result = executor(&out).execute(r#"print("hi")"#, 10, false);

    assert!(result.success, "stderr: {}", result.stderr);
    assert_eq!(result.stdout, "hi\n");
    assert_eq!(result.stderr, "");
    assert!(result.installed.is_empty());
    assert!(result.failed.is_empty());
    assert!(result.artifacts.is_empty());
    assert!(result.elapsed_seconds > 0.0);
}

#[test]
fn stdlib_imports_are_confirmed_without_pip() {
    if !python_available() {
        return;
    }
    let out = tempfile::tempdir().unwrap();
    let result = executor(&out).execute("import json\nprint(json.dumps([1]))\n", 10, false);

    assert!(result.success, "stderr: {}", result.stderr);
    assert_eq!(result.installed, vec!["json"]);
    assert!(result.failed.is_empty());
}

#[cfg(unix)]
#[test]
fn install_failure_skips_execution() {
    let out = tempfile::tempdir().unwrap();
    let executor = executor(&out).with_install_command("false", Vec::new());
    let source = "import definitely_not_a_real_pkg\nprint('body ran')\n";
    let result = executor.execute(source, 10, false);

    assert!(!result.success);
    assert_eq!(result.failed, vec!["definitely_not_a_real_pkg"]);
    // The program body must never have run.
    assert_eq!(result.stdout, "");
    assert!(result.stderr.contains("Failed to install packages"));
    assert!(result.stderr.contains("definitely_not_a_real_pkg"));
    assert!(result.artifacts.is_empty());
}

#[test]
fn runtime_fault_preserves_partial_output() {
    if !python_available() {
        return;
    }
    let out = tempfile::tempdir().unwrap();
    let source = "print('partial')\n1 / 0\n";
    let result = executor(&out).execute(source, 10, false);

    assert!(!result.success);
    assert!(result.stdout.contains("partial"));
    assert!(result.stderr.contains("ZeroDivisionError"));
    assert!(result.stderr.contains("Traceback"));
    assert!(result.artifacts.is_empty());
}

#[test]
fn timeout_hard_kills_the_program() {
    if !python_available() {
        return;
    }
    let out = tempfile::tempdir().unwrap();
    let start = std::time::Instant::now();
    let source = "import time\nprint('started', flush=True)\ntime.sleep(60)\n";
    let result = executor(&out).execute(source, 1, false);

    assert!(!result.success);
    assert!(start.elapsed().as_secs() < 30, "child was not killed promptly");
    assert!(result.stderr.contains("timeout"));
    assert!(result.artifacts.is_empty());
}

#[test]
fn render_augmented_run_stores_harvested_video() {
    if !python_available() {
        return;
    }
    let out = tempfile::tempdir().unwrap();
    // Stand-in for a renderer: the program drops an mp4 into the
    // conventional quality-tier path inside its working tree.
    let source = "import os\n\
                  os.makedirs('media/videos/demo/720p30', exist_ok=True)\n\
                  with open('media/videos/demo/720p30/Demo.mp4', 'wb') as f:\n\
                  \x20   f.write(b'0' * 1024)\n";
    let result = executor(&out).execute(source, 10, true);

    assert!(result.success, "stderr: {}", result.stderr);
    assert_eq!(result.artifacts.len(), 1);
    let name = &result.artifacts[0];
    assert!(name.starts_with("Demo_"), "unexpected name: {name}");
    assert!(name.ends_with(".mp4"), "unexpected name: {name}");
    let timestamp = &name["Demo_".len()..name.len() - ".mp4".len()];
    assert!(
        !timestamp.is_empty() && timestamp.bytes().all(|b| b.is_ascii_digit()),
        "unexpected name: {name}"
    );
    assert!(out.path().join(name).exists());
}

#[test]
fn render_augment_without_scene_runs_unmodified() {
    if !python_available() {
        return;
    }
    let out = tempfile::tempdir().unwrap();
    let result = executor(&out).execute("print('no scene here')\n", 10, true);

    assert!(result.success, "stderr: {}", result.stderr);
    assert_eq!(result.stdout, "no scene here\n");
    // Augmentation was requested but nothing rendered: empty artifact
    // list, success reflects only the execution outcome.
    assert!(result.artifacts.is_empty());
}

#[test]
fn working_tree_leaves_no_trace() {
    if !python_available() {
        return;
    }
    let out = tempfile::tempdir().unwrap();
    // The program records its own working directory into the output dir.
    let marker = out.path().join("cwd.txt");
    let source = format!(
        "import os\nopen({:?}, 'w').write(os.getcwd())\n",
        marker.to_str().unwrap()
    );
    let result = executor(&out).execute(&source, 10, false);
    assert!(result.success, "stderr: {}", result.stderr);

    let tree_path = std::fs::read_to_string(&marker).unwrap();
    assert!(
        !std::path::Path::new(tree_path.trim()).exists(),
        "working tree {tree_path} survived the request"
    );
}
