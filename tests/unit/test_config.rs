//! Unit tests for the config module
//!
//! Tests cover:
//! - OperationMode parsing and display
//! - SecurityConfig defaults
//! - TOML loading from files

use gatekeeper::config::{BlockedPattern, OperationMode, SecurityConfig, DEFAULT_SECURITY_CONFIG};
use std::io::Write;

mod operation_mode_tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", OperationMode::Discovery), "discovery");
        assert_eq!(format!("{}", OperationMode::Migration), "migration");
    }

    #[test]
    fn test_only_four_modes_parse() {
        for name in ["discovery", "coverage", "enhancement", "migration"] {
            assert!(name.parse::<OperationMode>().is_ok());
        }
        for name in ["", "normal", "yolo", "discover"] {
            assert!(name.parse::<OperationMode>().is_err());
        }
    }

    #[test]
    fn test_unknown_mode_rejected_by_toml() {
        #[derive(serde::Deserialize)]
        struct Session {
            #[allow(dead_code)]
            mode: OperationMode,
        }
        assert!(toml::from_str::<Session>("mode = \"migration\"").is_ok());
        assert!(toml::from_str::<Session>("mode = \"daemon\"").is_err());
    }
}

mod security_config_tests {
    use super::*;

    #[test]
    fn test_default_blocks_and_gates() {
        let config = &*DEFAULT_SECURITY_CONFIG;
        assert!(config.blocked_patterns.iter().any(|p| p.source() == "sudo"));
        assert!(config.require_approval_for.iter().any(|p| p == "rm "));
        assert!(config.allowed_commands.iter().any(|p| p == "ls"));
        assert!(config.allowed_commands.iter().any(|p| p == "git status"));
    }

    #[test]
    fn test_default_regex_patterns_compiled() {
        let regexes: Vec<_> = DEFAULT_SECURITY_CONFIG
            .blocked_patterns
            .iter()
            .filter(|p| p.is_regex())
            .map(BlockedPattern::source)
            .collect();
        assert!(regexes.contains(&"chmod .*777"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
allowed_commands = ["make", "git status"]
blocked_patterns = ["sudo", "make .*deploy"]
require_approval_for = ["make release"]
"#
        )
        .unwrap();

        let config = SecurityConfig::load(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(config.allowed_commands, vec!["make", "git status"]);
        assert!(config.blocked_patterns[1].is_regex());

        let v = gatekeeper::validate("make DEPLOY=prod deploy", &config);
        assert_eq!(
            v.reason.as_deref(),
            Some("Command matches blocked pattern: make .*deploy")
        );
        assert!(gatekeeper::validate("make release", &config).requires_approval);
        assert!(gatekeeper::validate("make test", &config).is_clear());
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "blocked_patterns = \"not a list\"").unwrap();
        let err = SecurityConfig::load(Some(file.path().to_str().unwrap())).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse security config"));
    }

    #[test]
    fn test_blank_allow_entry_does_not_open_policy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allowed_commands = [\"\", \"ls\"]").unwrap();
        let config = SecurityConfig::load(Some(file.path().to_str().unwrap())).unwrap();

        let v = gatekeeper::validate("curl https://example.com", &config);
        assert!(!v.allowed);
        assert_eq!(v.reason.as_deref(), Some("Command not in allowlist: curl"));
        assert!(gatekeeper::validate("ls -la", &config).is_clear());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = SecurityConfig::from_toml_str("").unwrap();
        assert_eq!(config, *DEFAULT_SECURITY_CONFIG);
    }
}
