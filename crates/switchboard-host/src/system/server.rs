use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use switchboard_tools::{PositionalArgs, ServerToolContext};

pub(super) const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time for the calling user
pub(super) fn current_time<'a>(
    context: &'a ServerToolContext,
    args: PositionalArgs,
) -> BoxFuture<'a, anyhow::Result<Value>> {
    Box::pin(async move {
        let format = args
            .optional_or_default::<String>(0)?
            .unwrap_or_else(|| DEFAULT_FORMAT.to_owned());

        let local = context.user.local_now();
        let formatted = jiff::fmt::strtime::format(format.as_bytes(), &local)
            .map_err(|e| anyhow::anyhow!("invalid time format `{format}`: {e}"))?;

        let time_zone = local
            .time_zone()
            .iana_name()
            .map_or_else(|| local.offset().to_string(), str::to_owned);

        Ok(json!({
            "local": formatted,
            "time_zone": time_zone,
            "timestamp": local.timestamp().to_string(),
        }))
    })
}
