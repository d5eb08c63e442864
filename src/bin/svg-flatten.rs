use clap::crate_version;

use svgflat::{
    flatten_drawable, parse_path, ArcFlattening, Drawable, FlattenError, FlattenOptions,
    Polyline, Transform,
};

use std::io::{self, BufRead, Write};

#[derive(Debug)]
pub struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! impl_error_from {
    ($err:ty) => {
        impl From<$err> for Error {
            fn from(e: $err) -> Self {
                Self(format!("{e}"))
            }
        }
    };
}

impl_error_from!(FlattenError);
impl_error_from!(io::Error);
impl_error_from!(serde_json::Error);
impl_error_from!(clap::Error);

macro_rules! error {
    ($($arg:tt)*) => (Error(std::format!($($arg)*)));
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Format {
    Json,
    Text,
}

fn build_cli() -> clap::Command {
    clap::Command::new("svg-flatten")
        .version(concat!("version ", crate_version!()))
        .about("Flatten SVG path data into polylines")
        .disable_version_flag(true)
        .arg(
            clap::Arg::new("version")
                .short('v')
                .long("version")
                .help("Display the version information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("max_error")
                .short('e')
                .long("max-error")
                .num_args(1)
                .value_name("number")
                .default_value("0.1")
                .value_parser(parse_max_error)
                .help("Maximum distance between a curve and its polyline, in output units")
                .action(clap::ArgAction::Set),
        )
        .arg(
            clap::Arg::new("max_depth")
                .short('d')
                .long("max-depth")
                .num_args(1)
                .value_name("number")
                .default_value(DEFAULT_MAX_DEPTH_STR)
                .value_parser(parse_max_depth)
                .help("Maximum number of pieces a single curve is split into")
                .action(clap::ArgAction::Set),
        )
        .arg(
            clap::Arg::new("matrix")
                .short('m')
                .long("matrix")
                .num_args(1)
                .value_name("a,b,c,d,e,f")
                .allow_hyphen_values(true)
                .value_parser(parse_matrix)
                .help("Transformation matrix applied to the paths")
                .action(clap::ArgAction::Set),
        )
        .arg(
            clap::Arg::new("sample_arcs")
                .long("sample-arcs")
                .help("Sample elliptical arcs directly instead of converting them to curves")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("format")
                .short('f')
                .long("format")
                .num_args(1)
                .value_parser(["json", "text"])
                .ignore_case(true)
                .default_value("json")
                .help("Output format")
                .action(clap::ArgAction::Set),
        )
        .arg(
            clap::Arg::new("PATH_DATA")
                .help("Path data strings; read one per line from stdin if none are given")
                .num_args(1..)
                .action(clap::ArgAction::Append),
        )
}

const DEFAULT_MAX_DEPTH_STR: &str = "32";

fn parse_max_error(v: &str) -> Result<f64, String> {
    match v.parse::<f64>() {
        Ok(e) if e.is_finite() && e > 0.0 => Ok(e),
        Ok(_) => Err(String::from("Invalid maximum error")),
        Err(e) => Err(format!("{e}")),
    }
}

fn parse_max_depth(v: &str) -> Result<u32, String> {
    match v.parse::<u32>() {
        Ok(d) if d >= 1 => Ok(d),
        Ok(_) => Err(String::from("Invalid maximum depth")),
        Err(e) => Err(format!("{e}")),
    }
}

fn parse_matrix(v: &str) -> Result<Transform, String> {
    let numbers = v
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|e| format!("{e}")))
        .collect::<Result<Vec<f64>, String>>()?;

    let m: [f64; 6] = numbers
        .try_into()
        .map_err(|_| String::from("A matrix needs exactly six numbers"))?;

    if m.iter().all(|n| n.is_finite()) {
        Ok(Transform::from_matrix(m))
    } else {
        Err(String::from("Invalid matrix"))
    }
}

struct Flattener {
    options: FlattenOptions,
    transform: Transform,
    format: Format,
    inputs: Option<Vec<String>>,
}

impl Flattener {
    fn run(&self) -> Result<(), Error> {
        let inputs = match self.inputs {
            Some(ref inputs) => inputs.clone(),
            None => read_stdin_lines()?,
        };

        let results = inputs
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let drawable = Drawable::new(parse_path(d)).with_transform(self.transform);
                flatten_drawable(&drawable, &self.options)
                    .map_err(|e| error!("Error flattening path #{}: {}", i + 1, e))
            })
            .collect::<Result<Vec<Vec<Polyline>>, Error>>()?;

        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.format {
            Format::Json => {
                serde_json::to_writer(&mut out, &results)?;
                writeln!(out)?;
            }

            Format::Text => {
                for (i, polylines) in results.iter().enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }

                    for polyline in polylines {
                        writeln!(out, "{}", text_line(polyline))?;
                    }
                }
            }
        }

        out.flush()?;

        Ok(())
    }
}

fn read_stdin_lines() -> Result<Vec<String>, Error> {
    let stdin = io::stdin();
    let mut lines = Vec::new();

    for line in stdin.lock().lines() {
        let line = line.map_err(|e| error!("Error reading standard input: {}", e))?;
        let line = line.trim();

        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    Ok(lines)
}

fn text_line(polyline: &Polyline) -> String {
    polyline
        .points
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_args() -> Result<Flattener, Error> {
    let matches = build_cli()
        .try_get_matches()
        .or_else(|e| match e.kind() {
            clap::error::ErrorKind::DisplayHelp => e.exit(),
            _ => Err(e),
        })?;

    if matches.get_flag("version") {
        println!("svg-flatten version {}", crate_version!());
        std::process::exit(0);
    }

    let max_error = *matches
        .get_one::<f64>("max_error")
        .ok_or_else(|| error!("missing --max-error"))?;
    let max_depth = *matches
        .get_one::<u32>("max_depth")
        .ok_or_else(|| error!("missing --max-depth"))?;

    let arc_flattening = if matches.get_flag("sample_arcs") {
        ArcFlattening::Sample
    } else {
        ArcFlattening::Cubic
    };

    let options = FlattenOptions::default()
        .with_max_error(max_error)
        .with_max_depth(max_depth)
        .with_arc_flattening(arc_flattening);
    options.validate()?;

    let transform = matches
        .get_one::<Transform>("matrix")
        .copied()
        .unwrap_or_default();

    let format = match matches.get_one::<String>("format").map(|s| s.to_ascii_lowercase()) {
        Some(ref s) if s == "text" => Format::Text,
        _ => Format::Json,
    };

    let inputs = matches
        .get_many::<String>("PATH_DATA")
        .map(|values| values.cloned().collect());

    Ok(Flattener {
        options,
        transform,
        format,
        inputs,
    })
}

fn main() {
    if let Err(e) = parse_args().and_then(|flattener| flattener.run()) {
        std::eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgflat::DEFAULT_MAX_DEPTH;

    #[test]
    fn default_max_depth_matches_library() {
        assert_eq!(DEFAULT_MAX_DEPTH_STR.parse::<u32>().unwrap(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn parses_matrix_with_commas_or_spaces() {
        let expected = Transform::new_unchecked(1.0, 0.0, 0.0, 2.0, -3.0, 4.5);

        assert_eq!(parse_matrix("1,0,0,2,-3,4.5").unwrap(), expected);
        assert_eq!(parse_matrix("1 0 0 2 -3 4.5").unwrap(), expected);
        assert_eq!(parse_matrix(" 1, 0 0,2 -3 ,4.5 ").unwrap(), expected);
    }

    #[test]
    fn rejects_bad_matrices() {
        assert!(parse_matrix("1,0,0,1,0").is_err());
        assert!(parse_matrix("1,0,0,1,0,0,0").is_err());
        assert!(parse_matrix("1,0,0,1,0,x").is_err());
        assert!(parse_matrix("1,0,0,1,0,inf").is_err());
    }

    #[test]
    fn validates_numeric_options() {
        assert_eq!(parse_max_error("0.5"), Ok(0.5));
        assert!(parse_max_error("0").is_err());
        assert!(parse_max_error("-1").is_err());
        assert!(parse_max_error("NaN").is_err());

        assert_eq!(parse_max_depth("8"), Ok(8));
        assert!(parse_max_depth("0").is_err());
        assert!(parse_max_depth("-2").is_err());
    }

    #[test]
    fn text_line_joins_points() {
        let polyline = Polyline {
            points: vec![(0.0, 0.0), (1.5, -2.0)],
            closed: false,
            attributes: Default::default(),
        };
        assert_eq!(text_line(&polyline), "0,0 1.5,-2");
    }

    #[test]
    fn cli_is_well_formed() {
        build_cli().debug_assert();
    }
}
