use eyre::EyreHandler;
use reef_common::errors::{dedup_chain, display_chain};
use std::{error::Error, fmt};

/// Environment variable switching error reports to the verbose `color-eyre` format.
pub const DEBUG_ENV: &str = "REEF_DEBUG";

/// Error report handler for the `reefdeploy` binary.
///
/// `Display` is the one line form also used in deployment notifications. `Debug`, which is what
/// `main` prints on failure, lists the causes below the error, unless a verbose report was
/// requested through [`DEBUG_ENV`].
pub struct Handler {
    verbose: Option<Box<dyn EyreHandler>>,
}

impl Handler {
    /// Short reports only.
    pub fn short() -> Self {
        Self { verbose: None }
    }

    /// Delegates `Debug` output to `verbose`.
    pub fn verbose(verbose: Box<dyn EyreHandler>) -> Self {
        Self { verbose: Some(verbose) }
    }
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_chain(error))
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(verbose) = &self.verbose {
            return verbose.debug(error, f);
        }
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let messages = dedup_chain(error);
        let Some((message, causes)) = messages.split_first() else { return Ok(()) };
        write!(f, "{message}")?;
        if !causes.is_empty() {
            write!(f, "\n\nCaused by:")?;
            for (i, cause) in causes.iter().enumerate() {
                write!(f, "\n  {i}: {cause}")?;
            }
            write!(f, "\n\nSet {DEBUG_ENV}=1 for a detailed report.")?;
        }
        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(verbose) = &mut self.verbose {
            verbose.track_caller(location);
        }
    }
}

/// Installs the [`eyre`] and [`panic`](mod@std::panic) hooks.
///
/// Panics always get the `color-eyre` report.
pub fn install() {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug. Consider reporting it at https://github.com/reef-defi/reef-deploy")
        .into_hooks();
    panic_hook.install();

    let eyre_hook = eyre_hook.into_eyre_hook();
    let verbose = std::env::var_os(DEBUG_ENV).is_some();
    let installed = eyre::set_hook(Box::new(move |error| {
        Box::new(if verbose { Handler::verbose(eyre_hook(error)) } else { Handler::short() })
    }));
    if let Err(err) = installed {
        debug!(%err, "eyre hook already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Render<'a> {
        report: &'a eyre::Report,
        debug: bool,
    }

    impl fmt::Display for Render<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let handler = Handler::short();
            if self.debug {
                handler.debug(self.report.as_ref(), f)
            } else {
                handler.display(self.report.as_ref(), f)
            }
        }
    }

    fn render(report: &eyre::Report, debug: bool) -> String {
        Render { report, debug }.to_string()
    }

    #[test]
    fn single_line_display() {
        let report = eyre::eyre!("no signer found for account 0xabc").wrap_err("failed to deploy");
        assert_eq!(render(&report, false), "failed to deploy; no signer found for account 0xabc");
    }

    #[test]
    fn debug_lists_causes_with_hint() {
        let report = eyre::eyre!("connection refused")
            .wrap_err("failed to reach node")
            .wrap_err("failed to deploy Flipper");
        assert_eq!(
            render(&report, true),
            "failed to deploy Flipper\n\nCaused by:\n  0: failed to reach node\n  1: connection refused\n\nSet REEF_DEBUG=1 for a detailed report."
        );
    }

    #[test]
    fn debug_without_causes() {
        let report = eyre::eyre!("invalid RPC URL");
        assert_eq!(render(&report, true), "invalid RPC URL");
    }
}
