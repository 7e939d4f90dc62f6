mod tests {
    use crate::commands::{build_commit, compare_options, parse_millis};
    use crate::*;
    use benchtrail_core::config::Config;

    #[test]
    fn test_sanitize_path_allows_simple_relative() {
        let p = sanitize_path("dev/bench/data.js").expect("relative path should be allowed");
        assert_eq!(p, PathBuf::from("dev/bench/data.js"));
    }

    #[test]
    fn test_sanitize_path_rejects_parent_dir() {
        let err = sanitize_path("dev/../data.js").unwrap_err();
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[test]
    fn test_cli_args_rejects_parent_dir_in_data() {
        let err = CliArgs::try_parse_from(["benchtrail", "list", "--data", "../data.js"]).expect_err("should reject");
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[test]
    fn test_cli_args_append_flags() {
        let args = CliArgs::try_parse_from([
            "benchtrail",
            "append",
            "--input",
            "output.json",
            "--tool",
            "pytest",
            "--suite",
            "Tensorflow-IO Benchmarks",
            "--commit-id",
            "3e16038",
            "--alert-threshold",
            "150%",
            "--fail-on-alert",
            "--format",
            "markdown",
        ])
        .expect("should parse append");
        match args.command {
            Commands::Append {
                target,
                input,
                tool,
                commit,
                thresholds,
                format,
                dry_run,
                ..
            } => {
                assert_eq!(input, PathBuf::from("output.json"));
                assert_eq!(tool.as_deref(), Some("pytest"));
                assert_eq!(target.suite.as_deref(), Some("Tensorflow-IO Benchmarks"));
                assert!(target.data.is_none());
                assert_eq!(commit.commit_id.as_deref(), Some("3e16038"));
                assert_eq!(thresholds.alert_threshold.as_deref(), Some("150%"));
                assert!(thresholds.fail_on_alert);
                assert_eq!(format, ReportFormat::Markdown);
                assert!(!dry_run);
            }
            other => panic!("expected append command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_args_global_config_after_subcommand() {
        let args = CliArgs::try_parse_from(["benchtrail", "validate", "--config", "ci/benchtrail.toml"])
            .expect("global config flag");
        assert_eq!(args.config.as_deref(), Some(Path::new("ci/benchtrail.toml")));
        assert!(matches!(args.command, Commands::Validate { .. }));
    }

    #[test]
    fn test_env_toggle_values() {
        assert!(env_toggle_enabled("1"));
        assert!(env_toggle_enabled("benchtrail_core=debug"));
        assert!(!env_toggle_enabled("off"));
        assert!(!env_toggle_enabled("  "));
        assert_eq!(filter_expr_from("true"), None);
        assert_eq!(filter_expr_from("benchtrail_core=debug"), Some("benchtrail_core=debug".to_string()));
    }

    #[test]
    fn test_compare_options_flag_overrides_config() {
        let config = Config {
            alert_threshold: Some("300%".to_string()),
            fail_threshold: Some("400%".to_string()),
            ..Config::default()
        };
        let from_config = compare_options(&config, &ThresholdArgs::default()).expect("config thresholds");
        assert_eq!(from_config.alert.ratio(), 3.0);
        assert_eq!(from_config.fail.ratio(), 4.0);

        let flags = ThresholdArgs {
            alert_threshold: Some("150%".to_string()),
            ..ThresholdArgs::default()
        };
        let overridden = compare_options(&config, &flags).expect("flag thresholds");
        assert_eq!(overridden.alert.ratio(), 1.5);
        assert_eq!(overridden.fail.ratio(), 4.0);
    }

    #[test]
    fn test_build_commit_derives_url() {
        let args = CommitArgs {
            commit_id: Some("3e16038f8ce6bf76c927176d4d1fc8f4a73c2771".to_string()),
            commit_message: Some("handle missing dependencies".to_string()),
            author_name: Some("Jane Doe".to_string()),
            ..CommitArgs::default()
        };
        let commit = build_commit(&args, "https://github.com/tensorflow/io/").expect("commit");
        assert_eq!(
            commit.url,
            "https://github.com/tensorflow/io/commit/3e16038f8ce6bf76c927176d4d1fc8f4a73c2771"
        );
        assert_eq!(commit.author.name, "Jane Doe");
        assert_eq!(commit.committer.name, "Jane Doe");
        assert!(commit.distinct);
    }

    #[test]
    fn test_build_commit_rejects_bad_timestamp() {
        let args = CommitArgs {
            commit_id: Some("abc".to_string()),
            commit_timestamp: Some("yesterday".to_string()),
            ..CommitArgs::default()
        };
        assert!(build_commit(&args, "").is_err());
    }

    #[test]
    fn test_parse_millis_rfc3339() {
        assert_eq!(parse_millis("2021-01-18T12:47:47-08:00").expect("valid"), 1_611_002_867_000);
        assert!(parse_millis("2021-01-18").is_err());
    }
}
