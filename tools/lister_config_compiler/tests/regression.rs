use std::path::PathBuf;

use lister_config_compiler::{
    generate_from_path, parse_config_file, parse_config_str, render_generated_config,
    validate_config, ConfigCompilerError, IdleToml,
};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("missing tools dir")
        .parent()
        .expect("missing repo root")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn repo_config_compiles() {
    let config = repo_root().join("config/lister.toml");
    let generated = generate_from_path(&config).expect("repo config should compile");
    assert!(generated.contains("pub const LISTER_CONFIG: ListerConfig"));
    assert!(generated.contains("pub const FILENAME_BUFFER_LEN: usize = 100;"));
    assert!(generated.contains("idle: IdleBehavior::Advance,"));
}

#[test]
fn generation_is_deterministic_for_same_input() {
    let config = fixture("valid_default.toml");
    let first = generate_from_path(&config).expect("first generation failed");
    let second = generate_from_path(&config).expect("second generation failed");
    assert_eq!(first, second);
}

#[test]
fn list_path_defaults_to_mount_point() {
    let config = parse_config_file(&fixture("valid_default.toml")).expect("fixture should parse");
    assert_eq!(config.volume.resolved_list_path(), "/mnt/mydrive");
    assert_eq!(config.volume.mount_flags, 0);
    let rendered = render_generated_config(&config);
    assert!(rendered.contains("list_path: \"/mnt/mydrive\","));
}

#[test]
fn hold_fixture_renders_every_field() {
    let path = fixture("valid_hold.toml");
    let config = parse_config_file(&path).expect("fixture should parse");
    validate_config(&config).expect("fixture should validate");
    assert_eq!(config.machine.idle, IdleToml::Hold);
    let rendered = render_generated_config(&config);

    for needle in [
        "pub const FILENAME_BUFFER_LEN: usize = 255;",
        "device: \"/dev/mmcblkb1\",",
        "mount_point: \"/mnt/card\",",
        "list_path: \"/mnt/card/logs\",",
        "filesystem: FilesystemKind::Fat,",
        "mount_flags: 1,",
        "idle: IdleBehavior::Hold,",
        "mount_wait_log_interval: 25,",
        "size_column_width: 8,",
    ] {
        assert!(
            rendered.contains(needle),
            "rendered output missing `{needle}`"
        );
    }
}

#[test]
fn semantic_validation_rejects_bad_values() {
    let cases = [
        (
            "invalid/interval_zero.toml",
            "machine.mount_wait_log_interval must be > 0",
        ),
        (
            "invalid/buffer_too_small.toml",
            "console.filename_buffer_len must be in 13..=255, got 8",
        ),
        (
            "invalid/list_path_outside_mount.toml",
            "volume.list_path `/mnt/other` must be inside volume.mount_point `/mnt/mydrive`",
        ),
        (
            "invalid/list_path_sibling_prefix.toml",
            "volume.list_path `/mnt/mydriveX` must be inside volume.mount_point `/mnt/mydrive`",
        ),
        (
            "invalid/relative_device.toml",
            "volume.device must start with `/`, got `mmcblka1`",
        ),
        (
            "invalid/width_zero.toml",
            "console.size_column_width must be in 1..=20, got 0",
        ),
    ];

    for (name, expected) in cases {
        let err = generate_from_path(&fixture(name)).expect_err(name);
        match err {
            ConfigCompilerError::Invalid(msg) => assert_eq!(msg, expected, "{name}"),
            other => panic!("{name}: expected validation error, got {other}"),
        }
    }
}

#[test]
fn list_path_below_mount_point_is_accepted() {
    let source = r#"
[volume]
device = "/dev/mmcblka1"
mount_point = "/mnt/mydrive"
filesystem = "fat"
list_path = "/mnt/mydrive/logs"

[machine]
idle = "advance"
mount_wait_log_interval = 100000

[console]
filename_buffer_len = 100
size_column_width = 10
"#;
    let config = parse_config_str(source).expect("inline config should parse");
    validate_config(&config).expect("nested list_path should validate");
}

#[test]
fn unknown_filesystem_is_a_parse_error() {
    let err = generate_from_path(&fixture("invalid/unknown_filesystem.toml"))
        .expect_err("ext4 is not supported");
    assert!(matches!(err, ConfigCompilerError::Parse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = generate_from_path(&fixture("does_not_exist.toml")).expect_err("missing file");
    assert!(matches!(err, ConfigCompilerError::Io(_)));
}
