pub mod check;
pub mod show;

use crate::cli::PolicyArgs;
use crate::error::Result;
use crate::manifest::Manifest;
use sbol::core::models::document::SbolDocument;
use sbol::core::policy::{DuplicatePolicy, ModelPolicy, ModelPolicyBuilder};
use std::path::Path;
use tracing::{debug, info};

/// Resolves the model policy: a base (defaults, `--strict` or a policy
/// file) with the individual flags layered on top.
pub fn resolve_policy(args: &PolicyArgs) -> Result<ModelPolicy> {
    let base = match (&args.policy, args.strict) {
        (Some(path), _) => {
            info!("Loading model policy from {:?}", path);
            ModelPolicy::load(path)?
        }
        (None, true) => ModelPolicy::strict(),
        (None, false) => ModelPolicy::default(),
    };

    let mut overrides = ModelPolicyBuilder::new();
    if args.reject_duplicates {
        overrides = overrides.duplicates(DuplicatePolicy::Reject);
    }
    if let Some(alphabet) = args.alphabet.resolve() {
        overrides = overrides.nucleotides(alphabet);
    }
    if args.check_display_ids {
        overrides = overrides.check_display_ids(true);
    }
    if args.compare_precedes {
        overrides = overrides.compare_precedes(true);
    }
    if args.forbid_cycles {
        overrides = overrides.allow_precedes_cycles(false);
    }
    if args.same_component_precedes {
        overrides = overrides.precedes_same_component(true);
    }

    let policy = overrides.build_on(&base);
    debug!(?policy, "Resolved model policy");
    Ok(policy)
}

pub fn load_document(manifest: &Path, policy: &PolicyArgs) -> Result<SbolDocument> {
    let policy = resolve_policy(policy)?;
    info!("Reading design manifest from {:?}", manifest);
    let manifest = Manifest::from_file(manifest)?;
    Ok(manifest.into_document(policy)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AlphabetChoice;
    use crate::error::CliError;
    use sbol::core::policy::NucleotidePolicy;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_flags() {
        assert_eq!(resolve_policy(&PolicyArgs::default()).unwrap(), ModelPolicy::default());
    }

    #[test]
    fn flags_override_the_policy_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.toml");
        fs::write(&path, "nucleotides = \"unchecked\"\ncompare-precedes = true\n").unwrap();

        let args = PolicyArgs {
            policy: Some(path),
            reject_duplicates: true,
            alphabet: AlphabetChoice {
                alphabet: None,
                strict_alphabet: true,
            },
            ..PolicyArgs::default()
        };
        let policy = resolve_policy(&args).unwrap();
        assert_eq!(policy.duplicates, DuplicatePolicy::Reject);
        assert_eq!(policy.nucleotides, NucleotidePolicy::Canonical);
        assert!(policy.compare_precedes);
        assert!(policy.allow_precedes_cycles);
    }

    #[test]
    fn same_component_flag_sets_only_its_switch() {
        let args = PolicyArgs {
            same_component_precedes: true,
            ..PolicyArgs::default()
        };
        let policy = resolve_policy(&args).unwrap();
        assert!(policy.precedes_same_component);
        assert_eq!(
            policy,
            ModelPolicy::builder().precedes_same_component(true).build()
        );
    }

    #[test]
    fn strict_base_keeps_every_check() {
        let args = PolicyArgs {
            strict: true,
            alphabet: AlphabetChoice {
                alphabet: Some(NucleotidePolicy::Iupac),
                strict_alphabet: false,
            },
            ..PolicyArgs::default()
        };
        let policy = resolve_policy(&args).unwrap();
        assert_eq!(policy.nucleotides, NucleotidePolicy::Iupac);
        assert_eq!(policy.duplicates, DuplicatePolicy::Reject);
        assert!(!policy.allow_precedes_cycles);
    }

    #[test]
    fn broken_policy_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.toml");
        fs::write(&path, "duplicates = 3\n").unwrap();
        let args = PolicyArgs {
            policy: Some(path),
            ..PolicyArgs::default()
        };
        assert!(matches!(resolve_policy(&args), Err(CliError::Policy(_))));
    }
}
