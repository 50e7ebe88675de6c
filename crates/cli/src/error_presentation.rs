use anyhow::Context;
use miette::Report;

const ORCHESTRATOR_CONTEXT: &str = "while running orchestrator";
const CONNECT_CONTEXT: &str = "while connecting to database";

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    InvalidConnectionUrl {
        url: String,
        reason: String,
    },
    UnsupportedDialect {
        tag: String,
    },
    Connect {
        dialect: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    Core(schemadiff_core::Error),
}

impl From<schemadiff_core::Error> for CliError {
    fn from(value: schemadiff_core::Error) -> Self {
        Self::Core(value)
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::InvalidConnectionUrl { url, reason } => {
            format!("[usage] invalid connection url `{url}`: {reason}")
        }
        CliError::UnsupportedDialect { tag } => {
            format!("[usage] unsupported or disabled dialect: {tag}")
        }
        CliError::Connect { dialect, source } => {
            let report = report_with_context(source, format!("{CONNECT_CONTEXT} ({dialect})"));
            format!("[connect] {report}")
        }
        CliError::Core(source) => {
            let category = core_category(&source);
            let report = report_with_context(source, ORCHESTRATOR_CONTEXT);
            format!("[{category}] {report}")
        }
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let context = context.into();
    let anyhow_error = std::result::Result::<(), E>::Err(source)
        .context(context)
        .expect_err("context wrapping must produce an error");
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &schemadiff_core::Error) -> &'static str {
    match error {
        schemadiff_core::Error::UnsupportedDialect { .. } => "dialect",
        schemadiff_core::Error::IntrospectionFailed { .. } => "introspect",
        schemadiff_core::Error::MalformedCatalog { .. } => "catalog",
    }
}
