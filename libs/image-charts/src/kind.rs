use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::options::ChartOptions;

const TYPE_KEY: &str = "type";
const STACKED_KEY: &str = "stacked";
const HIDE_AXIS_KEY: &str = "hideAxis";
const DATA_KEY: &str = "data";

/// The closed set of chart shapes the client can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    BarHorizontal,
    Line,
    Pie,
    Doughnut,
    Polar,
    Bubble,
}

impl ChartKind {
    pub const ALL: [Self; 7] = [
        Self::Bar,
        Self::BarHorizontal,
        Self::Line,
        Self::Pie,
        Self::Doughnut,
        Self::Polar,
        Self::Bubble,
    ];

    /// Name used to look the kind up, e.g. `"barHorizontal"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::BarHorizontal => "barHorizontal",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
            Self::Polar => "polar",
            Self::Bubble => "bubble",
        }
    }

    /// Chart-type code for `options`, before any option is consumed.
    #[must_use]
    pub fn type_code(self, options: &ChartOptions) -> String {
        let stacked = options.is_set(STACKED_KEY);
        let code = match self {
            Self::Bar if stacked => "bvs",
            Self::Bar => "bvg",
            Self::BarHorizontal if stacked => "bhs",
            Self::BarHorizontal => "bhg",
            Self::Line => "lc",
            Self::Pie if is_concentric(options) => "pc",
            Self::Pie => "p",
            Self::Doughnut => "pd",
            Self::Polar => "pa",
            Self::Bubble => "bb",
        };
        if self == Self::Line && options.is_set(HIDE_AXIS_KEY) {
            format!("{code}:nda")
        } else {
            code.to_owned()
        }
    }

    /// Return `options` with this kind's `type` set and its hint flags removed.
    #[must_use]
    pub fn decorate(self, options: ChartOptions) -> ChartOptions {
        let code = self.type_code(&options);
        let options = if self == Self::Line {
            options.without(HIDE_AXIS_KEY)
        } else {
            options
        };
        options.with(TYPE_KEY, code)
    }
}

/// More than one data series with a nested second series.
fn is_concentric(options: &ChartOptions) -> bool {
    match options.get(DATA_KEY) {
        Some(Value::Array(series)) => {
            series.len() > 1 && matches!(series.get(1), Some(Value::Array(_)))
        }
        _ => false,
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a chart kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown chart kind: {0}")]
pub struct UnknownChartKind(pub String);

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(Self::Bar),
            "barHorizontal" | "bar_horizontal" | "bar-horizontal" => Ok(Self::BarHorizontal),
            "line" => Ok(Self::Line),
            "pie" => Ok(Self::Pie),
            "doughnut" => Ok(Self::Doughnut),
            "polar" => Ok(Self::Polar),
            "bubble" => Ok(Self::Bubble),
            other => Err(UnknownChartKind(other.to_owned())),
        }
    }
}
