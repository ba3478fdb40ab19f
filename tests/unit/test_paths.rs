use gatekeeper::safety::{is_safe, PathGuard};
use gatekeeper::PolicyError;

const ROOT: &str = "/home/user/project";

#[test]
fn test_scenarios() {
    assert!(!is_safe("../../etc/passwd", ROOT));
    assert!(is_safe("src/index.ts", ROOT));
    assert!(is_safe("/tmp/cache.json", ROOT));
}

#[test]
fn test_tmp_safe_regardless_of_root() {
    for root in ["/home/user/project", "/srv/app", "/"] {
        assert!(is_safe("/tmp/build/output.log", root));
    }
}

#[test]
fn test_relative_paths_inside_root_are_safe() {
    for path in ["README.md", "src/a/b/c.rs", "./src/../tests/x.rs", "a/../b"] {
        assert!(is_safe(path, ROOT), "expected {} to be safe", path);
    }
}

#[test]
fn test_paths_resolving_above_root_are_unsafe() {
    for path in ["..", "../x", "a/../../x", "./../project2/x", "src/../../../tmp/x"] {
        assert!(!is_safe(path, ROOT), "expected {} to be unsafe", path);
    }
}

#[test]
fn test_windows_style_paths() {
    let root = r"C:\Users\dev\project";
    assert!(is_safe(r"src\lib.rs", root));
    assert!(!is_safe(r"..\..\Windows\System32", root));
}

#[test]
fn test_guard_check_returns_path_rejected() {
    let guard = PathGuard::new(ROOT);
    match guard.check("/var/log/syslog") {
        Err(PolicyError::PathRejected { path, reason }) => {
            assert_eq!(path, "/var/log/syslog");
            assert_eq!(reason, "outside project root");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(guard.check("src/main.rs").is_ok());
}

#[test]
fn test_guard_is_shareable_across_threads() {
    let guard = PathGuard::new(ROOT);
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                assert!(guard.is_safe("src/lib.rs"));
                assert!(!guard.is_safe("../../../root/.ssh/id_rsa"));
            });
        }
    });
}
