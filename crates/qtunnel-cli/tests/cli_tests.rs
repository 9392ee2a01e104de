//! CLI argument parsing and configuration tests.
//!
//! The CLI is a binary crate, so argument parsing is checked with
//! `try_parse_from` on mirrored clap structs, and configuration loading is
//! checked through the `qtunnel-sim` types the commands delegate to.

// ============================================================================
// Configuration files
// ============================================================================

mod config_loading {
    use std::fs;

    use qtunnel_sim::{Evolution, EvolutionMode, SimConfig, SimError, TrotterOrder};

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qtunnel.yaml");
        fs::write(
            &path,
            "register_width: 2\ndt: 0.01\nsteps: 12\norder: second\nmode: incremental\nseed: 7\n",
        )
        .unwrap();

        let config = SimConfig::from_file(&path).unwrap();
        assert_eq!(config.register_width, 2);
        assert_eq!(config.dt, 0.01);
        assert_eq!(config.steps, 12);
        assert_eq!(config.order, TrotterOrder::Second);
        assert_eq!(config.mode, EvolutionMode::Incremental);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.effective_coupling(), 200.0);
    }

    #[test]
    fn test_config_file_drives_evolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qtunnel.yaml");
        fs::write(&path, "register_width: 1\nsteps: 0\n").unwrap();

        let config = SimConfig::from_file(&path).unwrap();
        let mut evolution = Evolution::from_config(&config).unwrap();
        let dist = evolution.run(config.steps);
        assert_eq!(dist.probabilities(), &[0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_config_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "register_width: 40\n").unwrap();

        assert!(matches!(
            SimConfig::from_file(&path),
            Err(SimError::InvalidRegisterWidth { .. })
        ));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "register_width: [unterminated\n").unwrap();

        let err = SimConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, SimError::Parse(_)));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_missing_config_file() {
        let path = "/tmp/qtunnel_test_nonexistent_config_12345.yaml";
        assert!(matches!(
            SimConfig::from_file(path),
            Err(SimError::Io(_))
        ));
    }

    #[test]
    fn test_effective_config_round_trips_through_yaml() {
        let mut config = SimConfig::default();
        config.register_width = 4;
        config.renormalize = true;
        let yaml = config.to_yaml().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effective.yaml");
        fs::write(&path, yaml).unwrap();
        assert_eq!(SimConfig::from_file(&path).unwrap(), config);
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Args, Parser, Subcommand, ValueEnum};
    use qtunnel_sim::{EvolutionMode, TrotterOrder};

    // Mirror the CLI structs for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "qtunnel")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[arg(short, long, global = true)]
        config: Option<String>,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Args, Debug, Default)]
    struct TestSimArgs {
        #[arg(short = 'n', long)]
        width: Option<usize>,
        #[arg(long)]
        dt: Option<f64>,
        #[arg(short = 't', long)]
        steps: Option<usize>,
        #[arg(long)]
        coupling: Option<f64>,
        #[arg(long)]
        order: Option<TrotterOrder>,
        #[arg(long)]
        mode: Option<EvolutionMode>,
        #[arg(long)]
        renormalize: bool,
        #[arg(long)]
        seed: Option<u64>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
    enum TestFormat {
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Run {
            #[command(flatten)]
            sim: TestSimArgs,
            #[arg(short, long, value_enum, default_value = "table")]
            format: TestFormat,
            #[arg(long, default_value = "10")]
            top: usize,
        },
        Sample {
            #[command(flatten)]
            sim: TestSimArgs,
            #[arg(short, long, default_value = "1024")]
            shots: u64,
        },
        Animate {
            #[command(flatten)]
            sim: TestSimArgs,
            #[arg(long, default_value = "0")]
            delay_ms: u64,
        },
        Config {
            #[command(flatten)]
            sim: TestSimArgs,
        },
        Version,
    }

    // --- Run command ---

    #[test]
    fn test_parse_run_minimal() {
        let cli = TestCli::try_parse_from(["qtunnel", "run"]).unwrap();
        match cli.command {
            TestCommands::Run { sim, format, top } => {
                assert!(sim.width.is_none());
                assert!(sim.steps.is_none());
                assert!(!sim.renormalize);
                assert_eq!(format, TestFormat::Table);
                assert_eq!(top, 10);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_with_all_args() {
        let cli = TestCli::try_parse_from([
            "qtunnel",
            "run",
            "-n",
            "4",
            "--dt",
            "0.01",
            "-t",
            "100",
            "--coupling",
            "12.5",
            "--order",
            "second",
            "--mode",
            "incremental",
            "--renormalize",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Run { sim, format, .. } => {
                assert_eq!(sim.width, Some(4));
                assert_eq!(sim.dt, Some(0.01));
                assert_eq!(sim.steps, Some(100));
                assert_eq!(sim.coupling, Some(12.5));
                assert_eq!(sim.order, Some(TrotterOrder::Second));
                assert_eq!(sim.mode, Some(EvolutionMode::Incremental));
                assert!(sim.renormalize);
                assert_eq!(format, TestFormat::Json);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_rejects_unknown_mode() {
        let result = TestCli::try_parse_from(["qtunnel", "run", "--mode", "lazy"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_run_rejects_unknown_format() {
        let result = TestCli::try_parse_from(["qtunnel", "run", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_run_rejects_non_numeric_width() {
        let result = TestCli::try_parse_from(["qtunnel", "run", "-n", "three"]);
        assert!(result.is_err());
    }

    // --- Sample command ---

    #[test]
    fn test_parse_sample_defaults() {
        let cli = TestCli::try_parse_from(["qtunnel", "sample"]).unwrap();
        match cli.command {
            TestCommands::Sample { sim, shots } => {
                assert_eq!(shots, 1024);
                assert!(sim.seed.is_none());
            }
            _ => panic!("Expected Sample command"),
        }
    }

    #[test]
    fn test_parse_sample_with_seed() {
        let cli =
            TestCli::try_parse_from(["qtunnel", "sample", "-s", "500", "--seed", "42"]).unwrap();
        match cli.command {
            TestCommands::Sample { sim, shots } => {
                assert_eq!(shots, 500);
                assert_eq!(sim.seed, Some(42));
            }
            _ => panic!("Expected Sample command"),
        }
    }

    // --- Animate command ---

    #[test]
    fn test_parse_animate() {
        let cli = TestCli::try_parse_from([
            "qtunnel",
            "animate",
            "-t",
            "30",
            "--delay-ms",
            "100",
            "--order",
            "strang",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Animate { sim, delay_ms } => {
                assert_eq!(sim.steps, Some(30));
                assert_eq!(sim.order, Some(TrotterOrder::Second));
                assert_eq!(delay_ms, 100);
            }
            _ => panic!("Expected Animate command"),
        }
    }

    // --- Config command and globals ---

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli =
            TestCli::try_parse_from(["qtunnel", "config", "--config", "sim.yaml", "-n", "2"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some("sim.yaml"));
        match cli.command {
            TestCommands::Config { sim } => assert_eq!(sim.width, Some(2)),
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_parse_version() {
        let cli = TestCli::try_parse_from(["qtunnel", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_verbose_levels() {
        let cli = TestCli::try_parse_from(["qtunnel", "-v", "version"]).unwrap();
        assert_eq!(cli.verbose, 1);
        let cli = TestCli::try_parse_from(["qtunnel", "-vvv", "run"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_missing_subcommand() {
        let result = TestCli::try_parse_from(["qtunnel"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_subcommand() {
        let result = TestCli::try_parse_from(["qtunnel", "teleport"]);
        assert!(result.is_err());
    }
}
