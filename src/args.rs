//! Command-line arguments as a [`Parameters`] tree.
//!
//! - `-key:value` stores the string `value` under `key`
//! - `-flag` stores `true` under `flag`
//! - anything else, including `-` and an option with an empty name such as
//!   `-:value`, is positional and stored as `file000`, `file001`, ...
//!
//! ```rust
//! let params = pdl::from_args(["-mode:fast", "-v", "in.pdl", "out.pdl"]);
//!
//! assert_eq!(params.get_str("mode"), Some("fast"));
//! assert!(params.get_bool("v", false));
//! assert_eq!(params.get_str("file000"), Some("in.pdl"));
//! assert_eq!(params.get_str("file001"), Some("out.pdl"));
//! ```

use crate::Parameters;

/// Builds a tree from command-line style arguments. The program name should
/// not be included.
pub fn from_args<I>(args: I) -> Parameters
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut params = Parameters::new();
    let mut positional = 0usize;
    for arg in args {
        let arg = arg.as_ref();
        let option = arg
            .strip_prefix('-')
            .filter(|rest| !rest.is_empty() && !rest.starts_with(':'));
        if option.is_none() && arg.starts_with("-:") {
            tracing::debug!(arg, "option without a name, treating as positional");
        }
        match option {
            Some(option) => {
                let previous = match option.split_once(':') {
                    Some((key, value)) => params.insert(key, value),
                    None => params.insert(option, true),
                };
                if previous.is_some() {
                    tracing::debug!(option, "argument given more than once, keeping the last");
                }
            }
            None => {
                params.insert(format!("file{positional:03}"), arg);
                positional += 1;
            }
        }
    }
    tracing::trace!(entries = params.len(), positional, "collected arguments");
    params
}
