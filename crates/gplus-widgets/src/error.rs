//! Error types for the widget service

use std::fmt;

#[derive(Debug)]
pub enum WidgetError {
    Config(String),
    Http(reqwest::Error),
    Template(String),
    Io(Box<std::io::Error>),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::Config(msg) => write!(f, "Configuration error: {}", msg),
            WidgetError::Http(err) => write!(f, "HTTP error: {}", err),
            WidgetError::Template(msg) => write!(f, "Template error: {}", msg),
            WidgetError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::Http(err) => Some(err),
            WidgetError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WidgetError {
    fn from(err: reqwest::Error) -> Self {
        WidgetError::Http(err)
    }
}

impl From<std::io::Error> for WidgetError {
    fn from(err: std::io::Error) -> Self {
        WidgetError::Io(Box::new(err))
    }
}

impl From<toml::de::Error> for WidgetError {
    fn from(err: toml::de::Error) -> Self {
        WidgetError::Config(err.to_string())
    }
}

impl From<tracing_subscriber::filter::ParseError> for WidgetError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        WidgetError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WidgetError>;
