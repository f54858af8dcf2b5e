use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser as ClapParser;
use display_builtins::{builtins,
                       config::Config,
                       context::{RequestContext, RouteState, Services},
                       form::FilterFormEncoder,
                       permissions::LevelClassifier,
                       puzzles::PuzzleTable,
                       value::Value};

#[derive(clap::Parser, Debug)]
/// Call one of the template builtins against some request data, and
/// print the result as it would be inserted into a page.
struct Args {
    /// JSON config file (time zone, date format, user key, levels,
    /// puzzles)
    #[clap(long)]
    config: Option<PathBuf>,

    /// JSON file with the request data (default: empty map)
    #[clap(long)]
    data: Option<PathBuf>,

    /// Request path, for `form`
    #[clap(long, default_value = "/")]
    path: String,

    /// Query string (without `?`), for `form`
    #[clap(long, default_value = "")]
    query: String,

    /// List the builtin names and exit
    #[clap(long)]
    list: bool,

    /// Name of the builtin to call
    name: Option<String>,

    /// Arguments; each is parsed as JSON if possible, else taken as
    /// a string. May start with `-` (negative numbers).
    #[clap(allow_hyphen_values = true)]
    args: Vec<String>,
}

fn parse_arg(s: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(s) {
        Ok(v) => Value::from(v),
        Err(_) => Value::from(s),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    }.override_from_env()?;
    config.apply_logging();

    let data = match &args.data {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("reading data file {path:?}"))?;
            let v: serde_json::Value = serde_json::from_str(&s)
                .with_context(|| format!("parsing data file {path:?}"))?;
            Value::from(v)
        }
        None => Value::map(std::iter::empty::<(&str, Value)>()),
    };
    let route = RouteState::from_path_and_query(&args.path, &args.query)
        .context("decoding --path/--query")?;

    let classifier = LevelClassifier::new(config.levels);
    let puzzles: PuzzleTable = config.puzzles.iter().collect();
    let forms = FilterFormEncoder;
    let ctx = RequestContext::new(data, route, &config, Services {
        classifier: &classifier,
        puzzles: &puzzles,
        forms: &forms,
    });
    let table = builtins(&ctx);

    if args.list {
        for name in table.names() {
            println!("{name}");
        }
        return Ok(())
    }

    let name = args.name.as_deref().ok_or_else(
        || anyhow!("need the name of a builtin (or --list)"))?;
    let values: Vec<Value> = args.args.iter().map(|s| parse_arg(s)).collect();
    let output = table.call(name, &values)?;
    println!("{}", output.to_html());
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_negative_args() {
        let args = Args::try_parse_from(["builtins", "date", "-5"]).expect("valid");
        assert_eq!(args.name.as_deref(), Some("date"));
        assert_eq!(args.args, ["-5"]);
        assert_eq!(parse_arg(&args.args[0]), Value::Int(-5));

        let args = Args::try_parse_from(
            ["builtins", "--list", "format_float", "3.14159", "-1"]).expect("valid");
        assert!(args.list);
        assert_eq!(args.args, ["3.14159", "-1"]);
    }

    #[test]
    fn t_parse_arg() {
        assert_eq!(parse_arg("\"x\""), Value::from("x"));
        assert_eq!(parse_arg("news"), Value::from("news"));
        assert_eq!(parse_arg("[1]"), Value::seq([1]));
    }
}
