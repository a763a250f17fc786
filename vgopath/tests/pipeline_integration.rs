//! Integration tests for the mirroring pipeline.
//!
//! A fake resolver replays canned `go list -m -json` / `go env -json`
//! output from files, so these run without a Go toolchain.
//!
//! Run with: `cargo test --test pipeline_integration`

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use vgopath::config::MirrorConfig;
use vgopath::module::{CloseError, ModuleReader, ModuleRecord, ResolverCommand};
use vgopath::{run, PipelineError};

// ============================================================================
// Helpers
// ============================================================================

/// Resolver that prints prepared files instead of running `go`.
struct FakeResolver {
    modules: PathBuf,
    env: PathBuf,
}

impl FakeResolver {
    fn new(dir: &Path, modules: &str, env: &str) -> Self {
        let resolver = Self {
            modules: dir.join("modules.json"),
            env: dir.join("env.json"),
        };
        fs::write(&resolver.modules, modules).unwrap();
        fs::write(&resolver.env, env).unwrap();
        resolver
    }
}

impl ResolverCommand for FakeResolver {
    fn list_modules(&self, dir: &Path) -> Command {
        let mut cmd = Command::new("cat");
        cmd.arg(&self.modules).current_dir(dir);
        cmd
    }

    fn env(&self, dir: &Path, _vars: &[&str]) -> Command {
        let mut cmd = Command::new("cat");
        cmd.arg(&self.env).current_dir(dir);
        cmd
    }
}

/// Resolver that runs a shell script for the module listing.
struct ScriptResolver(&'static str);

impl ResolverCommand for ScriptResolver {
    fn list_modules(&self, dir: &Path) -> Command {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", self.0]).current_dir(dir);
        cmd
    }

    fn env(&self, dir: &Path, _vars: &[&str]) -> Command {
        self.list_modules(dir)
    }
}

fn module_json(path: &str, dir: &Path) -> String {
    format!(r#"{{"Path": "{}", "Dir": "{}"}}"#, path, dir.display())
}

fn mock_module(root: &Path, name: &str, files: &[&str]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), *file).unwrap();
    }
    dir
}

fn sorted_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Every symlink under `dir` with its target, relative to `dir`.
fn symlink_graph(dir: &Path) -> Vec<(PathBuf, PathBuf)> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<(PathBuf, PathBuf)>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let rel = path.strip_prefix(base).unwrap().to_path_buf();
            if path.is_symlink() {
                out.push((rel, fs::read_link(&path).unwrap()));
            } else if path.is_dir() {
                out.push((rel, PathBuf::new()));
                walk(base, &path, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_end_to_end_layout() {
    let work = TempDir::new().unwrap();
    let src = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let m1 = mock_module(src.path(), "m1", &["go.mod", "m1.go"]);
    let m1sub = mock_module(src.path(), "m1sub", &["go.mod", "sub.go"]);

    let modules = [
        module_json("m1", &m1),
        module_json("m1/sub", &m1sub),
        r#"{"Path": "m2", "Dir": ""}"#.to_string(),
    ]
    .join("\n");
    let resolver = FakeResolver::new(work.path(), &modules, "{}");

    let config = MirrorConfig::new(dest.path())
        .with_source_dir(work.path())
        .skip_bin(true)
        .skip_build_cache(true);
    let summary = run(&config, &resolver).unwrap();

    assert_eq!(summary.modules_listed, 3);
    assert_eq!(summary.modules_linked, 2);

    let root = dest.path().join("src");
    assert_eq!(sorted_entries(&root), vec!["m1"]);

    let m1_dst = root.join("m1");
    assert!(m1_dst.is_dir());
    assert!(!m1_dst.is_symlink());
    assert_eq!(sorted_entries(&m1_dst), vec!["go.mod", "m1.go", "sub"]);
    assert_eq!(fs::read_link(m1_dst.join("m1.go")).unwrap(), m1.join("m1.go"));
    assert_eq!(fs::read_link(m1_dst.join("sub")).unwrap(), m1sub);
    assert!(!root.join("m2").exists());
}

#[test]
fn test_rerun_produces_same_graph() {
    let work = TempDir::new().unwrap();
    let src = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let a = mock_module(src.path(), "a", &["go.mod"]);
    let b = mock_module(src.path(), "b", &["go.mod", "b.go"]);
    let c = mock_module(src.path(), "c", &["go.mod"]);

    let modules = [
        module_json("github.com/org/a", &a),
        module_json("github.com/org/a/b", &b),
        module_json("golang.org/x/c", &c),
    ]
    .join("\n");
    let resolver = FakeResolver::new(work.path(), &modules, "{}");
    let config = MirrorConfig::new(dest.path())
        .with_source_dir(work.path())
        .skip_bin(true)
        .skip_build_cache(true);

    let first = run(&config, &resolver).unwrap();
    let graph = symlink_graph(dest.path());
    let second = run(&config, &resolver).unwrap();

    assert_eq!(first, second);
    assert_eq!(symlink_graph(dest.path()), graph);
    assert!(dest.path().join("src/golang.org/x/c").is_symlink());
}

#[test]
fn test_modules_removed_from_graph_disappear() {
    let work = TempDir::new().unwrap();
    let src = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let a = mock_module(src.path(), "a", &["go.mod"]);
    let b = mock_module(src.path(), "b", &["go.mod"]);

    let config = MirrorConfig::new(dest.path())
        .with_source_dir(work.path())
        .skip_bin(true)
        .skip_build_cache(true);

    let both = [module_json("a", &a), module_json("b", &b)].join("\n");
    run(&config, &FakeResolver::new(work.path(), &both, "{}")).unwrap();
    assert!(dest.path().join("src/b").is_symlink());

    run(
        &config,
        &FakeResolver::new(work.path(), &module_json("a", &a), "{}"),
    )
    .unwrap();
    assert!(dest.path().join("src/a").is_symlink());
    assert!(!dest.path().join("src/b").exists());
}

#[test]
fn test_duplicate_path_leaves_destination_untouched() {
    let work = TempDir::new().unwrap();
    let src = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let a = mock_module(src.path(), "a", &["go.mod"]);
    let b = mock_module(src.path(), "b", &["go.mod"]);

    let modules = [module_json("x/y", &a), module_json("x/y", &b)].join("\n");
    let resolver = FakeResolver::new(work.path(), &modules, "{}");
    let config = MirrorConfig::new(dest.path())
        .with_source_dir(work.path())
        .skip_bin(true)
        .skip_build_cache(true);

    let err = run(&config, &resolver).unwrap_err();
    assert!(matches!(err, PipelineError::Tree(_)));
    assert!(err.to_string().contains("module x/y already exists"));
    assert!(!dest.path().join("src").exists());
}

#[test]
fn test_parent_segment_cannot_escape_destination() {
    let work = TempDir::new().unwrap();
    let src = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let a = mock_module(src.path(), "a", &["go.mod"]);
    let x = mock_module(src.path(), "x", &["go.mod"]);

    fs::write(dest.path().join("keep.txt"), "keep").unwrap();
    fs::create_dir_all(dest.path().join("src/old")).unwrap();

    for bad in ["../x", "a/../../x", "./x"] {
        let modules = [module_json("a", &a), module_json(bad, &x)].join("\n");
        let resolver = FakeResolver::new(work.path(), &modules, "{}");
        let config = MirrorConfig::new(dest.path())
            .with_source_dir(work.path())
            .skip_bin(true)
            .skip_build_cache(true);

        let err = run(&config, &resolver).unwrap_err();
        assert!(matches!(err, PipelineError::Tree(_)), "path {:?}", bad);
        assert_eq!(fs::read_to_string(dest.path().join("keep.txt")).unwrap(), "keep");
        assert_eq!(sorted_entries(dest.path()), vec!["keep.txt", "src"]);
        assert_eq!(sorted_entries(&dest.path().join("src")), vec!["old"]);
    }
    assert!(x.join("go.mod").exists());
}

#[test]
fn test_empty_path_fails() {
    let work = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let resolver = FakeResolver::new(work.path(), r#"{"Path": "", "Dir": "/tmp"}"#, "{}");
    let config = MirrorConfig::new(dest.path())
        .with_source_dir(work.path())
        .skip_bin(true)
        .skip_build_cache(true);

    let err = run(&config, &resolver).unwrap_err();
    assert_eq!(
        err.to_string(),
        "building module tree: invalid empty module path"
    );
}

#[test]
fn test_malformed_output_fails() {
    let work = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let resolver = FakeResolver::new(work.path(), r#"{"Path": "a", "Dir": "/a"} {"#, "{}");
    let config = MirrorConfig::new(dest.path())
        .with_source_dir(work.path())
        .skip_bin(true)
        .skip_build_cache(true);

    let err = run(&config, &resolver).unwrap_err();
    assert!(matches!(err, PipelineError::Listing(_)));
}

#[test]
fn test_link_failure_names_module_path() {
    let work = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let modules = [
        r#"{"Path": "github.com/foo/bar", "Dir": "/nonexistent/bar"}"#,
        r#"{"Path": "github.com/foo/bar/v2", "Dir": "/nonexistent/v2"}"#,
    ]
    .join("\n");
    let resolver = FakeResolver::new(work.path(), &modules, "{}");
    let config = MirrorConfig::new(dest.path())
        .with_source_dir(work.path())
        .skip_bin(true)
        .skip_build_cache(true);

    let err = run(&config, &resolver).unwrap_err();
    assert!(err
        .to_string()
        .starts_with("linking modules: [path github.com/foo/bar]: "));
}

#[test]
fn test_secondary_roots_linked() {
    let work = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let gopath = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();

    let env = format!(
        r#"{{"GOBIN": "", "GOPATH": "{}", "GOCACHE": "{}"}}"#,
        gopath.path().display(),
        cache.path().display()
    );
    let resolver = FakeResolver::new(work.path(), "", &env);
    let config = MirrorConfig::new(dest.path())
        .with_source_dir(work.path())
        .skip_modules(true);

    let summary = run(&config, &resolver).unwrap();

    let bin = dest.path().join("bin");
    assert_eq!(summary.bin_link.as_deref(), Some(bin.as_path()));
    assert_eq!(fs::read_link(&bin).unwrap(), gopath.path().join("bin"));
    assert_eq!(
        fs::read_link(dest.path().join("cache")).unwrap(),
        cache.path()
    );
    assert!(!dest.path().join("src").exists());
}

#[test]
fn test_missing_gocache_is_an_error() {
    let work = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let resolver = FakeResolver::new(work.path(), "", r#"{"GOBIN": "/b"}"#);
    let config = MirrorConfig::new(dest.path())
        .with_source_dir(work.path())
        .skip_modules(true)
        .skip_bin(true);

    let err = run(&config, &resolver).unwrap_err();
    assert!(matches!(err, PipelineError::MissingRoot { .. }));
    assert_eq!(err.to_string(), "linking build cache: GOCACHE is not set");
}

#[test]
fn test_creates_missing_destination() {
    let work = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();
    let dest = base.path().join("nested/gopath");

    let resolver = FakeResolver::new(work.path(), "", "{}");
    let config = MirrorConfig::new(&dest)
        .with_source_dir(work.path())
        .skip_bin(true)
        .skip_build_cache(true);

    run(&config, &resolver).unwrap();
    assert!(dest.join("src").is_dir());
}

// ============================================================================
// Reader shutdown
// ============================================================================

#[test]
fn test_close_gives_up_after_three_seconds() {
    let mut reader = ModuleReader::spawn(
        Path::new("/"),
        &ScriptResolver(r#"trap '' TERM; echo '{"Path": "a"}'; sleep 8"#),
    )
    .unwrap();

    // The trap is in place once the first record arrives
    let mut buf = vec![ModuleRecord::default(); 1];
    assert_eq!(reader.read(&mut buf).unwrap().count, 1);

    let start = Instant::now();
    let err = reader.close().unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, CloseError::Timeout { .. }));
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_secs(6));
}
