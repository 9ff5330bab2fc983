use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read cars document '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cars document '{}' is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("car record is missing")]
    MissingRecord,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("statistics are undefined for an empty collection")]
    EmptyCollection,

    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize json output: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("failed to serialize yaml output: {0}")]
    YamlSerialize(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid args: {0}\n\nTip: run `carq --help` to see usage and examples.")]
    InvalidArgs(String),

    #[error("load error: {0}\n\n{tip}", tip = load_tip(.0))]
    Load(#[from] LoadError),

    #[error("query error: {0}\n\n{tip}", tip = engine_tip(.0))]
    Engine(#[from] EngineError),

    #[error("output error: {0}\n\nTip: supported formats are `table`, `json`, `yaml`.")]
    Output(#[from] OutputError),
}

fn load_tip(error: &LoadError) -> &'static str {
    match error {
        LoadError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
            "Tip: the cars document was not found. Pass it with `--file <PATH>` or set CARQ_FILE."
        }
        LoadError::Read { .. } => "Tip: check that the cars document is readable.",
        LoadError::Malformed { .. } => {
            "Tip: the document must be a JSON array of objects with `model`, `price`, `color`, `mileage` and `components`."
        }
    }
}

fn engine_tip(error: &EngineError) -> &'static str {
    match error {
        EngineError::InvalidArgument(_) => {
            "Tip: sort attributes are `model`, `price`, `color`, `mileage`; price ranges need min < max."
        }
        EngineError::EmptyCollection => {
            "Tip: no valid cars were loaded. Run with `-v` to see which records were rejected."
        }
        EngineError::Invariant(_) => "Tip: this is a bug in carq, please report it.",
    }
}
