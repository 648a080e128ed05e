use log::{info, warn};
use std::env;

/*-------------------------------------------------------------------------------------------------
  Utility Functions
-------------------------------------------------------------------------------------------------*/

/// Get and parse an environment variable value or return a default value.
pub(crate) fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

/// Join blob-name segments with `/`, skipping empty segments and stray separators.
///
/// ```
/// use cloudendpoints::join_blob_name;
///
/// assert_eq!(join_blob_name(["", "artifacts", "Exchange.txt"]), "artifacts/Exchange.txt");
/// assert_eq!(join_blob_name(["site/", "/artifacts/", "a.txt"]), "site/artifacts/a.txt");
/// ```
pub fn join_blob_name<'s, I>(segments: I) -> String
where
    I: IntoIterator<Item = &'s str>,
{
    segments
        .into_iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<&str>>()
        .join("/")
}

/*-------------------------------------------------------------------------------------------------
  Test HTTP Server
-------------------------------------------------------------------------------------------------*/


/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
