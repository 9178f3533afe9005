use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "pellet-chase"])
        .status()
        .expect("failed to invoke cargo check for pellet-chase CLI binary");

    assert!(status.success(), "cargo check --bin pellet-chase should succeed");
}

#[test]
fn builtin_maze_is_cleared_by_every_algorithm() {
    let output = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args([
            "run",
            "--quiet",
            "--bin",
            "pellet-chase",
            "--",
            "--compare",
            "--ghost-policy",
            "stationary",
            "--max-ticks",
            "20000",
        ])
        .output()
        .expect("failed to invoke the pellet-chase CLI binary");

    assert!(output.status.success(), "comparison run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for label in ["bfs", "dfs", "astar", "ucs"] {
        assert!(
            stdout.lines().any(|line| line.starts_with(label) && line.contains("won")),
            "{label} should clear the maze:\n{stdout}"
        );
    }
}
