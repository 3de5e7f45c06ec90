use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "site_kit=info,site_kit_core=info,site_kit_navigation=info,\
site_kit_notifier=info,tower_http=info";
const VERBOSE_FILTER: &str = "site_kit=debug,site_kit_core=debug,site_kit_navigation=debug,\
site_kit_notifier=debug,tower_http=debug,info";

/// Install the global subscriber. `RUST_LOG` wins over the built-in filters.
pub fn init_logger(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        })
    });

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        // Structured output for hosted deployments
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .compact(),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_cover_every_workspace_crate() {
        for filter in [DEFAULT_FILTER, VERBOSE_FILTER] {
            for target in [
                "site_kit=",
                "site_kit_core=",
                "site_kit_navigation=",
                "site_kit_notifier=",
            ] {
                assert!(filter.contains(target), "{} missing from {}", target, filter);
            }
            assert!(EnvFilter::try_new(filter).is_ok());
        }
    }
}
