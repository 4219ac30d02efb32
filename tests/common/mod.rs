use assert_cmd::Command;
use std::fs;
use std::path::Path;

pub const SAMPLE: &str =
    "#EDU first line\n#EDU second line\ndef foo():\n    pass\n#NOTE unrelated\n";

pub fn tagdoc_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tagdoc").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a file below `root`, creating parent directories
pub fn write_source(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
