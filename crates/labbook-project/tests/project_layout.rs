use std::fs;
use std::path::PathBuf;

use labbook_project::{
    find_project_in, initialize_project, InitOptions, ProjectContext, ProjectManifest,
    DEFAULT_LAYOUT, MANIFEST_FILE,
};
use tempfile::tempdir;

fn quiet() -> InitOptions {
    InitOptions {
        git: false,
        ..InitOptions::default()
    }
}

#[test]
fn init_creates_layout_and_manifest() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("wave-study");
    let opts = InitOptions {
        authors: vec!["A. Researcher".to_string()],
        ..quiet()
    };
    let project = initialize_project(&root, None, &opts).unwrap();

    assert_eq!(project.name(), "wave-study");
    assert_eq!(project.manifest().authors, vec!["A. Researcher".to_string()]);
    for folder in DEFAULT_LAYOUT {
        assert!(root.join(folder).is_dir(), "missing {folder}");
    }
    assert!(root.join(MANIFEST_FILE).is_file());
    let readme = fs::read_to_string(root.join("README.md")).unwrap();
    assert!(readme.starts_with("# wave-study"));
    assert!(readme.contains("A. Researcher"));
}

#[test]
fn init_refuses_occupied_directory_unless_forced() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("busy");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("keep.txt"), "x").unwrap();

    let err = initialize_project(&root, Some("busy"), &quiet()).unwrap_err();
    assert_eq!(err.info().code, "init.not-empty");
    assert!(root.join("keep.txt").exists());

    let forced = InitOptions {
        force: true,
        readme: false,
        ..quiet()
    };
    initialize_project(&root, Some("busy"), &forced).unwrap();
    assert!(!root.join("keep.txt").exists());
    assert!(!root.join("README.md").exists());
}

#[test]
fn invalid_name_leaves_a_forced_target_untouched() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("precious");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("precious.txt"), "data").unwrap();

    let forced = InitOptions {
        force: true,
        ..quiet()
    };
    let err = initialize_project(&root, Some("   "), &forced).unwrap_err();
    assert_eq!(err.info().code, "manifest.name");
    assert_eq!(fs::read_to_string(root.join("precious.txt")).unwrap(), "data");
    assert!(!root.join(MANIFEST_FILE).exists());
    assert!(!root.join("data").exists());
}

#[test]
fn paths_derive_from_the_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    let project = initialize_project(&root, Some("proj"), &quiet()).unwrap();

    assert_eq!(project.projectdir(), root.as_path());
    assert_eq!(project.datadir(), root.join("data"));
    assert_eq!(project.srcdir(), root.join("src"));
    assert_eq!(project.plotsdir(), root.join("plots"));
    assert_eq!(project.scriptsdir(), root.join("scripts"));
    assert_eq!(project.papersdir(), root.join("papers"));
    assert_eq!(project.notebooksdir(), root.join("notebooks"));
    assert_eq!(project.subdir("videos"), root.join("videos"));
    assert_eq!(
        project.data_path(["sims", "a=1.json"]),
        root.join("data").join("sims").join("a=1.json")
    );
}

#[test]
fn discovery_walks_up_to_the_manifest() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    initialize_project(&root, Some("proj"), &quiet()).unwrap();
    let deep = root.join("data/sims");

    assert_eq!(find_project_in(&deep, Some(dir.path())), Some(root.clone()));
    assert_eq!(find_project_in(dir.path(), Some(dir.path())), None);
}

#[test]
fn discovery_stops_at_the_boundary() {
    let dir = tempdir().unwrap();
    ProjectManifest::new("outer")
        .save(&dir.path().join(MANIFEST_FILE))
        .unwrap();
    let inner = dir.path().join("home/user/work");
    fs::create_dir_all(&inner).unwrap();

    let home = dir.path().join("home/user");
    assert_eq!(find_project_in(&inner, Some(&home)), None);
    assert_eq!(
        find_project_in(&inner, None),
        Some(PathBuf::from(dir.path()))
    );
}

#[test]
fn open_reads_naming_defaults() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(MANIFEST_FILE),
        "name = \"sweep\"\n\n[naming]\ndigits = 2\nconnector = \",\"\n",
    )
    .unwrap();
    let project = ProjectContext::open(dir.path()).unwrap();
    let naming = project.naming();
    assert_eq!(naming.digits, 2);
    assert_eq!(naming.connector, ",");
}

#[test]
fn broken_manifest_is_a_project_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(MANIFEST_FILE), "name = ").unwrap();
    let err = ProjectContext::open(dir.path()).unwrap_err();
    assert_eq!(err.info().code, "manifest.parse");
}

#[test]
fn activation_checks_the_project_name() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    initialize_project(&root, Some("proj"), &quiet()).unwrap();
    let inside = root.join("scripts");

    let project = ProjectContext::activate(&inside, Some("proj")).unwrap();
    assert_eq!(project.projectdir(), root.as_path());

    let err = ProjectContext::activate(&inside, Some("other")).unwrap_err();
    assert_eq!(err.info().code, "project.name-mismatch");
    assert_eq!(err.info().context["found"], "proj");
}

#[test]
fn git_problems_never_fail_initialisation() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("tracked");
    let project = initialize_project(&root, None, &InitOptions::default()).unwrap();
    assert_eq!(project.name(), "tracked");
    assert!(root.join(".gitignore").is_file());
}
