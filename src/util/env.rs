//! Process configuration, read once from the environment (and `.env`, if present).
//!
//! Deserialization goes through a small serde `Deserializer` over `(key, value)` string pairs so
//! that numeric and optional fields can live on the same struct as plain strings.

use std::num::NonZeroU32;
use std::sync::LazyLock;

use serde::Deserialize;
use serde::de::value::MapDeserializer;
use serde::de::{self, IntoDeserializer};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::constants::SCOREBOARD_LIMIT;

static ENV_VARS: LazyLock<OnceCell<Env>> = LazyLock::new(OnceCell::new);

pub async fn env() -> EnvResult<&'static Env> {
    ENV_VARS.get_or_try_init(|| async { Env::new() }).await
}

pub async fn get_var(var: Var) -> EnvResult<&'static str> {
    let vars = env().await?;
    Ok(match var {
        Var::DatabaseUrl => &vars.database_url,
        Var::LogFilter => &vars.log_filter,
        Var::ServiceName => &vars.service_name,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Env {
    pub database_url: String,
    #[serde(default = "default_scoreboard_limit")]
    pub scoreboard_limit: NonZeroU32,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

impl Env {
    pub fn new() -> EnvResult<Self> {
        load_dotenv(dotenvy::dotenv())?;
        Ok(from_iter::<_, Env>(dotenvy::vars())?)
    }
}

/// Only a missing `.env` is tolerated; the process environment is authoritative then. A file
/// that exists but can't be read or parsed is an error.
fn load_dotenv<T>(loaded: Result<T, dotenvy::Error>) -> EnvResult<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => {
            tracing::debug!("no .env file, using process environment only");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[inline]
const fn default_scoreboard_limit() -> NonZeroU32 {
    SCOREBOARD_LIMIT
}

#[inline]
fn default_log_filter() -> String {
    "guild_score=debug,sqlx=info,info".to_string()
}

#[inline]
fn default_service_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

#[derive(Debug)]
pub enum Var {
    DatabaseUrl,
    LogFilter,
    ServiceName,
}

#[macro_export]
macro_rules! var {
    ($ev:expr) => {
        $crate::util::env::get_var($ev)
    };
}

// ---
//  Deserializer implementation
// ---

/// A single environment value, tagged with the key it came from for error reporting.
struct Val {
    key: String,
    raw: String,
}

impl<'de> IntoDeserializer<'de, EnvDeserializeError> for Val {
    type Deserializer = Self;
    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

macro_rules! parse_then_visit {
    ($($ty:ident => $method:ident,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, EnvDeserializeError>
            where
                V: de::Visitor<'de>
            {
                let parsed = self.raw.trim().parse::<$ty>().map_err(|e| {
                    EnvDeserializeError::Parse {
                        key: self.key.clone(),
                        value: self.raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                parsed.into_deserializer().$method(visitor)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Val {
    type Error = EnvDeserializeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.raw)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        if self.raw.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    parse_then_visit! {
        bool => deserialize_bool,
        u16 => deserialize_u16,
        u32 => deserialize_u32,
        u64 => deserialize_u64,
        i32 => deserialize_i32,
        i64 => deserialize_i64,
        f64 => deserialize_f64,
    }

    serde::forward_to_deserialize_any! {
        i8 i16 u8 f32 char str string unit bytes byte_buf map seq
        unit_struct tuple_struct identifier tuple ignored_any enum
        struct
    }
}

pub fn from_iter<Iter, T>(iter: Iter) -> Result<T, EnvDeserializeError>
where
    T: de::DeserializeOwned,
    Iter: IntoIterator<Item = (String, String)>,
{
    let pairs = iter.into_iter().map(|(key, raw)| {
        let val = Val {
            key: key.clone(),
            raw,
        };
        (key, val)
    });

    T::deserialize(MapDeserializer::new(pairs))
}

impl de::Error for EnvDeserializeError {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        EnvDeserializeError::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        EnvDeserializeError::MissingValue(field.to_ascii_uppercase())
    }
}

pub type EnvResult<T> = core::result::Result<T, EnvErr>;

#[derive(Debug, Error)]
pub enum EnvErr {
    #[error(transparent)]
    Dotenvy(#[from] dotenvy::Error),

    #[error(transparent)]
    DeserializationError(#[from] EnvDeserializeError),
}

#[derive(Debug, Error)]
pub enum EnvDeserializeError {
    #[error("env deserialization error: {0}")]
    Custom(String),

    #[error("missing required variable '{0}'")]
    MissingValue(String),

    #[error("{reason}: while parsing '{value}' (provider: {key})")]
    Parse {
        key: String,
        value: String,
        reason: String,
    },
}
