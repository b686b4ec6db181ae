//! Tests for the prune module.

use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create_dir_all should succeed in test temp dirs");
    }
    fs::write(path, content).expect("write should succeed in test temp dirs");
}

/// Count non-directory entries at any depth, without following links.
fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    let mut pending = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let entry = entry.unwrap();
            if entry.file_type().unwrap().is_dir() {
                pending.push(entry.path());
            } else {
                count += 1;
            }
        }
    }
    count
}

mod prune_target_tests {
    use super::*;

    #[test]
    fn names_are_deduplicated_and_sorted() {
        let target = PruneTarget::new("/vendor", ["ts", "sass", "ts"]).unwrap();
        assert_eq!(target.names().collect::<Vec<_>>(), vec!["sass", "ts"]);
    }

    #[test]
    fn prune_roots_resolve_under_root() {
        let target = PruneTarget::new("/vendor/anki", ["qt", "web/sass"]).unwrap();
        let roots: Vec<_> = target.prune_roots().collect();
        assert_eq!(roots[0], ("qt", Path::new("/vendor/anki/qt").to_path_buf()));
        assert_eq!(
            roots[1],
            ("web/sass", Path::new("/vendor/anki/web/sass").to_path_buf())
        );
    }

    #[test]
    fn rejects_names_escaping_the_root() {
        for name in ["", "  ", "..", "sass/../..", "/etc", ".", "./sass"] {
            let err = PruneTarget::new("/vendor", [name]).unwrap_err();
            assert_eq!(err.name, name);
        }
    }

    #[test]
    fn empty_target_is_allowed() {
        let target = PruneTarget::new("/vendor", Vec::<String>::new()).unwrap();
        assert!(target.is_empty());
    }
}

mod prune_tests {
    use super::*;

    #[test]
    fn removes_files_in_named_dirs_and_keeps_the_rest() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(&root.join("sass/a.css"), "a");
        write_file(&root.join("sass/sub/b.css"), "b");
        write_file(&root.join("ts/c.ts"), "c");
        write_file(&root.join("keep/d.txt"), "d");

        let target = PruneTarget::new(root, ["sass", "ts"]).unwrap();
        let report = prune(&target).unwrap();

        assert!(!root.join("sass/a.css").exists());
        assert!(!root.join("sass/sub/b.css").exists());
        assert!(!root.join("ts/c.ts").exists());
        assert!(root.join("keep/d.txt").exists());

        assert_eq!(report.root("sass").unwrap().files_removed, 2);
        assert_eq!(report.root("ts").unwrap().files_removed, 1);
        assert_eq!(report.total_files_removed(), 3);
    }

    #[test]
    fn directories_are_left_as_empty_shells() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("sass/sub/deeper/b.css"), "b");

        prune(&PruneTarget::new(tmp.path(), ["sass"]).unwrap()).unwrap();

        assert!(tmp.path().join("sass/sub/deeper").is_dir());
        assert_eq!(count_files(&tmp.path().join("sass")), 0);
    }

    #[test]
    fn second_run_removes_nothing() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("ts/x/y.ts"), "y");
        write_file(&tmp.path().join("ts/z.ts"), "z");
        let target = PruneTarget::new(tmp.path(), ["ts"]).unwrap();

        let first = prune(&target).unwrap();
        let second = prune(&target).unwrap();

        assert_eq!(first.total_files_removed(), 2);
        assert_eq!(second.total_files_removed(), 0);
        assert_eq!(count_files(&tmp.path().join("ts")), 0);
    }

    #[test]
    fn missing_root_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("qt/main.py"), "");

        let target = PruneTarget::new(tmp.path(), ["pylib", "qt"]).unwrap();
        let report = prune(&target).unwrap();

        let pylib = report.root("pylib").unwrap();
        assert!(!pylib.existed);
        assert_eq!(pylib.files_removed, 0);
        assert!(!tmp.path().join("pylib").exists());
        assert_eq!(report.root("qt").unwrap().files_removed, 1);
    }

    #[test]
    fn deep_nesting_does_not_recurse_on_the_call_stack() {
        let tmp = TempDir::new().unwrap();
        let mut dir = tmp.path().join("tools");
        for _ in 0..300 {
            dir.push("d");
        }
        write_file(&dir.join("leaf.txt"), "leaf");
        write_file(&tmp.path().join("tools/top.txt"), "top");

        let report = prune(&PruneTarget::new(tmp.path(), ["tools"]).unwrap()).unwrap();

        assert_eq!(report.total_files_removed(), 2);
        assert!(dir.is_dir());
        assert!(!dir.join("leaf.txt").exists());
    }

    #[test]
    fn failing_root_does_not_stop_the_others() {
        let tmp = TempDir::new().unwrap();
        // "python" exists as a file, so it cannot be traversed.
        write_file(&tmp.path().join("python"), "not a directory");
        write_file(&tmp.path().join("sass/a.css"), "a");
        write_file(&tmp.path().join("ts/b.ts"), "b");

        let target = PruneTarget::new(tmp.path(), ["python", "sass", "ts"]).unwrap();
        let err = prune(&target).unwrap_err();

        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].name, "python");
        assert!(matches!(
            err.failures[0].error,
            PruneRootError::Traversal { .. }
        ));
        assert_eq!(err.failures[0].error.path(), tmp.path().join("python"));
        assert!(err.to_string().contains("python"));

        assert_eq!(err.report.total_files_removed(), 2);
        assert!(!tmp.path().join("sass/a.css").exists());
        assert!(!tmp.path().join("ts/b.ts").exists());
        assert!(tmp.path().join("python").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_removed_without_following() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("keep/real.txt"), "real");
        fs::create_dir_all(tmp.path().join("sass")).unwrap();
        std::os::unix::fs::symlink(
            tmp.path().join("keep/real.txt"),
            tmp.path().join("sass/file-link"),
        )
        .unwrap();
        std::os::unix::fs::symlink(tmp.path().join("keep"), tmp.path().join("sass/dir-link"))
            .unwrap();

        let report = prune(&PruneTarget::new(tmp.path(), ["sass"]).unwrap()).unwrap();

        assert_eq!(report.total_files_removed(), 2);
        assert!(tmp.path().join("keep/real.txt").exists());
        assert!(fs::symlink_metadata(tmp.path().join("sass/dir-link")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_root_is_refused() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("keep/real.txt"), "real");
        std::os::unix::fs::symlink(tmp.path().join("keep"), tmp.path().join("ts")).unwrap();

        let err = prune(&PruneTarget::new(tmp.path(), ["ts"]).unwrap()).unwrap_err();

        assert!(err.to_string().contains("symbolic link"));
        assert!(tmp.path().join("keep/real.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_parent_component_is_refused() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("vendor");
        let outside = tmp.path().join("outside");
        write_file(&outside.join("sass/precious.txt"), "precious");
        write_file(&root.join("ts/c.ts"), "c");
        std::os::unix::fs::symlink(&outside, root.join("web")).unwrap();

        let target = PruneTarget::new(&root, ["ts", "web/sass"]).unwrap();
        let err = prune(&target).unwrap_err();

        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].name, "web/sass");
        assert_eq!(err.failures[0].error.path(), root.join("web"));
        assert!(err.to_string().contains("symbolic link"));
        assert!(outside.join("sass/precious.txt").exists());
        assert_eq!(err.report.root("ts").unwrap().files_removed, 1);
    }

    #[test]
    fn missing_parent_component_is_a_no_op() {
        let tmp = TempDir::new().unwrap();

        let report = prune(&PruneTarget::new(tmp.path(), ["web/sass"]).unwrap()).unwrap();

        assert!(!report.root("web/sass").unwrap().existed);
        assert_eq!(report.total_files_removed(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn deletion_failure_aborts_only_its_root() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("sass/a.css"), "a");
        write_file(&tmp.path().join("sass/locked/b.css"), "b");
        write_file(&tmp.path().join("ts/c.ts"), "c");

        let locked = tmp.path().join("sass/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits are not enforced for a privileged user.
        if fs::write(locked.join(".write-check"), "").is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            eprintln!("skipping: directory permissions are not enforced");
            return;
        }

        let target = PruneTarget::new(tmp.path(), ["sass", "ts"]).unwrap();
        let result = prune(&target);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let err = result.unwrap_err();

        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].name, "sass");
        assert!(matches!(
            err.failures[0].error,
            PruneRootError::Deletion { .. }
        ));
        assert_eq!(err.failures[0].error.path(), locked.join("b.css"));
        assert!(err.to_string().contains("failed to delete"));

        // Files at the top of the root go before any subdirectory is visited.
        assert!(!tmp.path().join("sass/a.css").exists());
        assert!(locked.join("b.css").exists());
        let sass = err.report.root("sass").unwrap();
        assert!(sass.existed);
        assert_eq!(sass.files_removed, 1);

        assert!(!tmp.path().join("ts/c.ts").exists());
        assert_eq!(err.report.root("ts").unwrap().files_removed, 1);
    }

    #[test]
    fn error_message_lists_every_failed_root() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("python"), "file");
        write_file(&tmp.path().join("qt"), "file");

        let err = prune(&PruneTarget::new(tmp.path(), ["python", "qt"]).unwrap()).unwrap_err();

        let msg = err.to_string();
        assert!(msg.starts_with("pruning failed for 2 root(s)"), "{msg}");
        assert!(msg.contains("; python: failed to traverse"), "{msg}");
        assert!(msg.contains("; qt: failed to traverse"), "{msg}");
    }
}
