use std::path::PathBuf;

use clap::Parser;

use crate::domain::csv::{ColumnSpec, Dialect, PermuteMode, RunConfig};
use crate::domain::error::Result;
use crate::infrastructure::config::{ConfigService, SettingsOverrides};

#[derive(Parser, Debug)]
#[command(
    name = "csv-permute",
    version,
    about = "Randomly permutes columns or rows in a structured data file (CSV/TSV)."
)]
pub struct Cli {
    /// Path to the input CSV/TSV file
    pub input_file: PathBuf,

    /// Path to write the permuted file to
    pub output_file: PathBuf,

    /// Field delimiter. Use '\t' or 'tab' for TSV. [default: ,]
    #[arg(long, allow_hyphen_values = true)]
    pub delimiter: Option<String>,

    /// Quote character [default: "]
    #[arg(long)]
    pub quotechar: Option<String>,

    /// Comma-separated column names or 0-based indices to keep in place
    #[arg(long = "exclude_columns", visible_alias = "exclude-columns", default_value = "")]
    pub exclude_columns: String,

    /// Shuffle data rows instead of columns
    #[arg(long = "permute_rows", visible_alias = "permute-rows")]
    pub permute_rows: bool,

    /// Input encoding label (e.g. utf-8, latin-1). Detected when omitted.
    #[arg(long)]
    pub encoding: Option<String>,

    /// Seed the shuffle for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file with delimiter, quotechar, encoding and seed defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Layer the flags over file and environment settings and build the
    /// run configuration
    pub fn into_run_config(self) -> Result<RunConfig> {
        let overrides = SettingsOverrides {
            delimiter: self.delimiter,
            quotechar: self.quotechar,
            encoding: self.encoding,
            seed: self.seed,
        };
        let settings = ConfigService::new(self.config).load(&overrides)?;

        let mut config = RunConfig::new(self.input_file, self.output_file)
            .with_dialect(Dialect::parse(&settings.delimiter, &settings.quotechar)?)
            .with_mode(PermuteMode::from_flag(self.permute_rows));
        config.exclude = ColumnSpec::parse_list(&self.exclude_columns);
        config.encoding = settings.encoding;
        config.seed = settings.seed;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positionals_and_defaults() {
        let cli = Cli::try_parse_from(["csv-permute", "in.csv", "out.csv"]).unwrap();
        assert_eq!(cli.input_file, PathBuf::from("in.csv"));
        assert_eq!(cli.output_file, PathBuf::from("out.csv"));
        assert_eq!(cli.exclude_columns, "");
        assert!(!cli.permute_rows);
        assert!(cli.delimiter.is_none());
    }

    #[test]
    fn test_underscore_and_kebab_flags() {
        let cli = Cli::try_parse_from([
            "csv-permute",
            "in.csv",
            "out.csv",
            "--exclude_columns",
            "id,2",
            "--permute-rows",
        ])
        .unwrap();
        assert_eq!(cli.exclude_columns, "id,2");
        assert!(cli.permute_rows);

        let cli = Cli::try_parse_from([
            "csv-permute",
            "in.csv",
            "out.csv",
            "--exclude-columns",
            "a",
            "--permute_rows",
        ])
        .unwrap();
        assert_eq!(cli.exclude_columns, "a");
        assert!(cli.permute_rows);
    }

    #[test]
    fn test_missing_output_is_usage_error() {
        assert!(Cli::try_parse_from(["csv-permute", "in.csv"]).is_err());
    }

    #[test]
    fn test_into_run_config_tsv() {
        let cli = Cli::try_parse_from([
            "csv-permute",
            "in.tsv",
            "out.tsv",
            "--delimiter",
            "\\t",
            "--exclude_columns",
            "b, 3",
            "--seed",
            "42",
        ])
        .unwrap();

        let config = cli.into_run_config().unwrap();
        assert_eq!(config.dialect, Dialect::tsv());
        assert_eq!(config.mode, PermuteMode::Columns);
        assert_eq!(
            config.exclude,
            vec![ColumnSpec::ByName("b".to_string()), ColumnSpec::ByIndex(3)]
        );
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_into_run_config_rejects_long_delimiter() {
        let cli =
            Cli::try_parse_from(["csv-permute", "in.csv", "out.csv", "--delimiter", ";;"]).unwrap();
        assert!(matches!(
            cli.into_run_config(),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_config_file_is_validation_error() {
        let cli = Cli::try_parse_from([
            "csv-permute",
            "in.csv",
            "out.csv",
            "--config",
            "/definitely/not/here.toml",
        ])
        .unwrap();
        assert!(matches!(
            cli.into_run_config(),
            Err(AppError::ValidationError(_))
        ));
    }
}
