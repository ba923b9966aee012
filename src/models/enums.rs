use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a string does not name any variant of a `str_enum!` type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {kind}: {value:?}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Parsing is lenient: case, whitespace, `_` and `-` are ignored, so
/// "Moderately Active", "moderately_active" and "ModeratelyActive" all match.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = fold(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| fold(v.as_str()) == wanted)
                    .ok_or_else(|| EnumParseError {
                        kind: stringify!($name),
                        value: s.into(),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

str_enum!(MessageRole {
    User => "user",
    Assistant => "assistant",
});

str_enum!(Gender {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

str_enum!(ActivityLevel {
    Sedentary => "Sedentary",
    ModeratelyActive => "Moderately Active",
    VeryActive => "Very Active",
});

str_enum!(YesNo {
    Yes => "Yes",
    No => "No",
});

str_enum!(RiskLabel {
    AtRisk => "at_risk",
    NotAtRisk => "not_at_risk",
    Unknown => "unknown",
});

impl YesNo {
    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Yes)
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}
