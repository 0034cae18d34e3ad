//! Single line log format for CloudWatch.
//!
//! Format: `LEVEL [request_id=... function_name=...] target: message [span{field=value}]`
//!
//! The fields of the enclosing `invocation` span are pulled to the front, so
//! that every line of an invocation can be found by its request id.

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Name of the span opened per Lambda invocation.
pub const INVOCATION_SPAN: &str = "invocation";

pub struct InvocationLogFormat;

impl<S, N> FormatEvent<S, N> for InvocationLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        write!(writer, "{:<5} ", metadata.level())?;

        let spans: Vec<_> = ctx
            .event_scope()
            .map(|scope| scope.from_root().collect())
            .unwrap_or_default();

        if let Some(invocation) = spans.iter().find(|span| span.name() == INVOCATION_SPAN) {
            let ext = invocation.extensions();
            if let Some(fields) = ext.get::<FormattedFields<N>>() {
                if !fields.is_empty() {
                    write!(writer, "[{}] ", fields)?;
                }
            }
        }

        write!(writer, "{}: ", metadata.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;

        let nested: Vec<_> = spans
            .iter()
            .filter(|span| span.name() != INVOCATION_SPAN)
            .collect();
        if !nested.is_empty() {
            write!(writer, " ")?;

            for span in nested {
                write!(writer, "[{}", span.name())?;

                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{}}}", fields)?;
                    }
                }

                write!(writer, "]")?;
            }
        }

        writeln!(writer)
    }
}
