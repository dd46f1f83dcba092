use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, ValueEnum};
use sheetview_core::config::{ViewerConfig, parse_delimiter};
use sheetview_core::search::DEFAULT_LIMIT;
use sheetview_core::selection::{parse_index, parse_selection, shorthand_expression};
use sheetview_core::viewer::{self, DEFAULT_MAX_COLS, DEFAULT_MAX_ROWS};
use sheetview_core::{
    Axis, ExactCase, Language, MatchMode, OutputFormat, Request, SearchSpec, SearchTarget,
    ViewOptions, ViewerError, presenter_for,
};
use std::io::{self, Write};
use std::path::PathBuf;

mod output;

const EXAMPLES: &str = "\
Examples:
  sheetview --path data.xlsx --size
  sheetview --path data.xlsx --rows 1 5 --max-cols 20
  sheetview --path data.xlsx --rows 10
  sheetview --path data.xlsx --rows 1,4,7-9
  sheetview --path data.xlsx --cols B AA --max-rows 100
  sheetview --path data.xlsx --search-col B \"test\" --mode exact --limit 5
  sheetview --path data.xlsx --search-row 1 \"err(or)?\" --mode regex --limit 20

Row and column indices start at 1. Columns also accept letters (A, B, ..., AA).";

#[derive(Parser)]
#[command(name = "sheetview")]
#[command(about = "View and search the first sheet of an Excel/ODS workbook", long_about = None)]
#[command(version, after_help = EXAMPLES)]
struct Cli {
    /// Path to the Excel/ODS file
    #[arg(long, value_name = "FILE")]
    path: PathBuf,

    #[command(flatten)]
    operation: OperationArgs,

    /// Maximum columns shown per row with --rows [default: 50]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_cols: Option<u32>,

    /// Maximum rows shown per column with --cols [default: 50]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_rows: Option<u32>,

    /// Search mode [default: fuzzy]
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Maximum number of matches returned [default: 10]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    limit: Option<u32>,

    /// Compare case-sensitively in exact mode
    #[arg(long)]
    case_sensitive: bool,

    /// Output format [default: json]
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Field delimiter for text output (`\t` for tab) [default: ,]
    #[arg(long, value_name = "CHAR", value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Message language [default: en]
    #[arg(long, value_enum)]
    lang: Option<LangArg>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct OperationArgs {
    /// Show the number of used rows and columns
    #[arg(long)]
    size: bool,

    /// Show rows: N (1 to N), X Y (X to Y) or a list like 1,3,5-8 [default: 1-3]
    #[arg(long, num_args = 0..=2, value_name = "SEL")]
    rows: Option<Vec<String>>,

    /// Show columns: N, X Y, letters or a list like A,C,AA-AC [default: 1-3]
    #[arg(long, num_args = 0..=2, value_name = "SEL")]
    cols: Option<Vec<String>>,

    /// Search a column (number or letter) for a keyword
    #[arg(long, num_args = 2, value_names = ["COLUMN", "KEYWORD"], allow_hyphen_values = true)]
    search_col: Option<Vec<String>>,

    /// Search a row for a keyword
    #[arg(long, num_args = 2, value_names = ["ROW", "KEYWORD"], allow_hyphen_values = true)]
    search_row: Option<Vec<String>>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Case-insensitive substring
    Fuzzy,
    /// Whole-value equality
    Exact,
    /// Regular expression
    Regex,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Fuzzy => MatchMode::Fuzzy,
            ModeArg::Exact => MatchMode::Exact,
            ModeArg::Regex => MatchMode::Regex,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// JSON output
    Json,
    /// Delimited text table
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LangArg {
    En,
    Zh,
}

impl From<LangArg> for Language {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::En => Language::En,
            LangArg::Zh => Language::Zh,
        }
    }
}

/// Everything needed to run and render one invocation
struct Settings {
    options: ViewOptions,
    format: OutputFormat,
    delimiter: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ViewerConfig::load(cli.config.as_deref());
    let lang = cli
        .lang
        .map(Language::from)
        .or(config.as_ref().ok().and_then(|c| c.defaults.lang))
        .unwrap_or_default();

    let outcome = config
        .map_err(anyhow::Error::from)
        .and_then(|config| run(&cli, &config, lang));
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(err) => output::print_error(&err, lang),
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, config: &ViewerConfig, lang: Language) -> Result<()> {
    let settings = resolve(cli, config)?;
    log::debug!("request: {:?}", settings.options.request);

    let report = viewer::run(&settings.options)?;
    let presenter = presenter_for(settings.format, lang, settings.delimiter);
    let rendered = presenter.render(&report)?;

    if let Some(warning) = report.warning().filter(|_| !presenter.embeds_warnings()) {
        output::print_warning(warning, lang);
    }

    io::stdout()
        .write_all(rendered.as_bytes())
        .context("Failed to write to stdout")?;
    Ok(())
}

/// Merge command line, config file and built-in defaults into typed options
fn resolve(cli: &Cli, config: &ViewerConfig) -> sheetview_core::Result<Settings> {
    let defaults = &config.defaults;
    let op = &cli.operation;

    let request = if let Some(values) = &op.rows {
        Request::Rows {
            expression: checked_expression(values, Axis::Row)?,
            max_cols: cli
                .max_cols
                .or(defaults.max_cols)
                .unwrap_or(DEFAULT_MAX_COLS),
        }
    } else if let Some(values) = &op.cols {
        Request::Cols {
            expression: checked_expression(values, Axis::Column)?,
            max_rows: cli
                .max_rows
                .or(defaults.max_rows)
                .unwrap_or(DEFAULT_MAX_ROWS),
        }
    } else if let Some(values) = &op.search_col {
        search_request(cli, config, Axis::Column, values)?
    } else if let Some(values) = &op.search_row {
        search_request(cli, config, Axis::Row, values)?
    } else {
        // The operation group is required, so this is --size
        Request::Size
    };

    // Config delimiters were validated when the file was loaded
    let delimiter = match (cli.delimiter, &defaults.delimiter) {
        (Some(d), _) => d,
        (None, Some(raw)) => parse_delimiter(raw).map_err(ViewerError::InvalidConfig)?,
        (None, None) => b',',
    };

    Ok(Settings {
        options: ViewOptions {
            path: cli.path.clone(),
            request,
        },
        format: cli
            .format
            .map(OutputFormat::from)
            .or(defaults.format)
            .unwrap_or_default(),
        delimiter,
    })
}

/// Expand `--rows`/`--cols` values and reject bad syntax before any file is opened
fn checked_expression(values: &[String], axis: Axis) -> sheetview_core::Result<String> {
    let expression = shorthand_expression(values);
    parse_selection(&expression, axis)?;
    Ok(expression)
}

fn search_request(
    cli: &Cli,
    config: &ViewerConfig,
    axis: Axis,
    values: &[String],
) -> sheetview_core::Result<Request> {
    let defaults = &config.defaults;
    let [index, keyword] = values else {
        return Err(ViewerError::InvalidIndex {
            axis,
            input: values.join(" "),
        });
    };
    let index = parse_index(index, axis)?;
    let target = match axis {
        Axis::Row => SearchTarget::Row(index),
        Axis::Column => SearchTarget::Column(index),
    };

    let mode = cli
        .mode
        .map(MatchMode::from)
        .or(defaults.mode)
        .unwrap_or_default();
    let exact_case = if cli.case_sensitive || defaults.case_sensitive == Some(true) {
        ExactCase::Sensitive
    } else {
        ExactCase::Insensitive
    };

    Ok(Request::Search {
        target,
        spec: SearchSpec::new(keyword.clone(), mode)
            .with_limit(cli.limit.or(defaults.limit).unwrap_or(DEFAULT_LIMIT))
            .with_exact_case(exact_case),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("sheetview").chain(args.iter().copied()))
    }

    fn settings(args: &[&str]) -> sheetview_core::Result<Settings> {
        resolve(&parse(args).unwrap(), &ViewerConfig::default())
    }

    fn indices(expression: &str, axis: Axis) -> Vec<u32> {
        parse_selection(expression, axis).unwrap().indices
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rows_shorthand() {
        let s = settings(&["--path", "a.xlsx", "--rows", "2", "4", "--max-cols", "2"]).unwrap();
        match s.options.request {
            Request::Rows {
                expression,
                max_cols,
            } => {
                assert_eq!(indices(&expression, Axis::Row), vec![2, 3, 4]);
                assert_eq!(max_cols, 2);
            }
            _ => panic!("expected rows request"),
        }

        let s = settings(&["--path", "a.xlsx", "--rows", "10"]).unwrap();
        let Request::Rows { expression, .. } = s.options.request else {
            panic!("expected rows request");
        };
        assert_eq!(expression, "1-10");
    }

    #[test]
    fn test_rows_default() {
        let s = settings(&["--path", "a.xlsx", "--rows"]).unwrap();
        let Request::Rows {
            expression,
            max_cols,
        } = s.options.request
        else {
            panic!("expected rows request");
        };
        assert_eq!(indices(&expression, Axis::Row), vec![1, 2, 3]);
        assert_eq!(max_cols, DEFAULT_MAX_COLS);
        assert_eq!(s.format, OutputFormat::Json);
        assert_eq!(s.delimiter, b',');
    }

    #[test]
    fn test_cols_letters() {
        let s = settings(&["--path", "a.xlsx", "--cols", "AA"]).unwrap();
        let Request::Cols { expression, .. } = s.options.request else {
            panic!("expected cols request");
        };
        assert_eq!(indices(&expression, Axis::Column), vec![27]);
    }

    #[test]
    fn test_search_col() {
        let s = settings(&[
            "--path", "a.xlsx", "--search-col", "B", "test", "--mode", "exact", "--limit", "2",
        ])
        .unwrap();
        let Request::Search { target, spec } = s.options.request else {
            panic!("expected search request");
        };
        assert_eq!(target, SearchTarget::Column(2));
        assert_eq!(spec.keyword, "test");
        assert_eq!(spec.mode, MatchMode::Exact);
        assert_eq!(spec.limit, 2);
        assert_eq!(spec.exact_case, ExactCase::Insensitive);
    }

    #[test]
    fn test_search_keyword_with_leading_dash() {
        for (args, expected) in [
            (&["--path", "a.xlsx", "--search-col", "A", "-5"][..], "-5"),
            (&["--path", "a.xlsx", "--search-row", "1", "-x"][..], "-x"),
            (
                &["--path", "a.xlsx", "--search-row", "1", "-\\d+", "--mode", "regex"][..],
                "-\\d+",
            ),
        ] {
            let s = settings(args).unwrap();
            let Request::Search { spec, .. } = s.options.request else {
                panic!("expected search request");
            };
            assert_eq!(spec.keyword, expected);
        }

        let s = settings(&["--path", "a.xlsx", "--search-row", "1", "-\\d+", "--mode", "regex"])
            .unwrap();
        let Request::Search { spec, .. } = s.options.request else {
            panic!("expected search request");
        };
        assert_eq!(spec.mode, MatchMode::Regex);
    }

    #[test]
    fn test_search_row_rejects_letters() {
        let err = settings(&["--path", "a.xlsx", "--search-row", "A", "x"])
            .err()
            .unwrap();
        assert!(matches!(err, ViewerError::InvalidIndex { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_bad_selection_is_usage_error() {
        let err = settings(&["--path", "a.xlsx", "--rows", "1,,3"]).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_usage_errors() {
        // Missing --path
        assert_eq!(
            parse(&["--size"]).err().unwrap().kind(),
            ErrorKind::MissingRequiredArgument
        );
        // No operation
        assert_eq!(
            parse(&["--path", "a.xlsx"]).err().unwrap().kind(),
            ErrorKind::MissingRequiredArgument
        );
        // Two operations
        assert_eq!(
            parse(&["--path", "a.xlsx", "--size", "--rows"])
                .err()
                .unwrap()
                .kind(),
            ErrorKind::ArgumentConflict
        );
        // Bad enum and non-positive numbers
        assert_eq!(
            parse(&["--path", "a.xlsx", "--size", "--mode", "glob"])
                .err()
                .unwrap()
                .kind(),
            ErrorKind::InvalidValue
        );
        assert_eq!(
            parse(&["--path", "a.xlsx", "--size", "--limit", "0"])
                .err()
                .unwrap()
                .kind(),
            ErrorKind::ValueValidation
        );
        // Usage errors exit with 2
        assert_eq!(parse(&["--bogus"]).err().unwrap().exit_code(), 2);
        // Help exits with 0
        assert_eq!(parse(&["--help"]).err().unwrap().exit_code(), 0);
    }

    #[test]
    fn test_config_defaults_and_precedence() {
        let mut config = ViewerConfig::default();
        config.defaults.max_rows = Some(7);
        config.defaults.format = Some(OutputFormat::Text);
        config.defaults.delimiter = Some(";".to_string());
        config.defaults.case_sensitive = Some(true);

        let cli = parse(&["--path", "a.xlsx", "--cols"]).unwrap();
        let s = resolve(&cli, &config).unwrap();
        let Request::Cols { max_rows, .. } = s.options.request else {
            panic!("expected cols request");
        };
        assert_eq!(max_rows, 7);
        assert_eq!(s.format, OutputFormat::Text);
        assert_eq!(s.delimiter, b';');

        let cli = parse(&[
            "--path", "a.xlsx", "--cols", "--max-rows", "3", "-f", "json", "--delimiter", "\\t",
        ])
        .unwrap();
        let s = resolve(&cli, &config).unwrap();
        let Request::Cols { max_rows, .. } = s.options.request else {
            panic!("expected cols request");
        };
        assert_eq!(max_rows, 3);
        assert_eq!(s.format, OutputFormat::Json);
        assert_eq!(s.delimiter, b'\t');

        let cli = parse(&["--path", "a.xlsx", "--search-row", "1", "x", "--mode", "exact"]).unwrap();
        let s = resolve(&cli, &config).unwrap();
        let Request::Search { spec, .. } = s.options.request else {
            panic!("expected search request");
        };
        assert_eq!(spec.exact_case, ExactCase::Sensitive);
    }
}
