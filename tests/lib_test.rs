//! Library integration tests.

use plugsync::PlugsyncError;

#[test]
fn error_types_are_public() {
    let err = PlugsyncError::Network {
        url: "https://example.com".into(),
        message: "timed out".into(),
    };
    assert!(err.to_string().contains("https://example.com"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> plugsync::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use plugsync::cli::{Cli, Commands};

    let cli = Cli::parse_from(["plugsync", "status"]);
    assert!(matches!(cli.command, Some(Commands::Status)));
}

#[test]
fn build_flag_toggler_is_usable_from_outside() {
    use plugsync::buildflag::BuildFlagToggler;
    use plugsync::host::MockDefineStore;

    let toggler = BuildFlagToggler::new("EA_ONBUILD");
    let mut defines = MockDefineStore::new();

    toggler.on_build_start(&mut defines).unwrap();
    toggler.on_build_finish(&mut defines).unwrap();

    assert!(defines.current().is_empty());
}

#[test]
fn source_ref_format_is_stable() {
    assert_eq!(
        plugsync::install::source_ref("pkg", "1.0.0", "https://repo.git"),
        "pkg@https://repo.git#v1.0.0"
    );
}
