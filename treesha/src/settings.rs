//! Turn parsed arguments (and an optional config file) into run settings.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::ArgMatches;
use treeshalib::{Config, HashOptions, OutputFormat, RootSpec};

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub options: HashOptions,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

impl Settings {
    /// Config file values first, command line on top.
    ///
    /// Roots are appended, exclusions merged, scalar options overridden.
    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        let config = match matches.get_one::<PathBuf>("config") {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let mut output_file = config.output_file.clone();
        let mut options = config.into_options();

        if let Some(roots) = matches.get_many::<String>("root") {
            for root in roots {
                let spec: RootSpec = root
                    .parse()
                    .with_context(|| format!("cannot use root argument '{root}'"))?;
                options.roots.push(spec);
            }
        }

        let mut filters = options.filters.clone();
        if let Some(folders) = matches.get_many::<String>("exclude-folders") {
            for list in folders {
                filters = filters.exclude_folders(list);
            }
        }
        if let Some(extensions) = matches.get_many::<String>("exclude-extensions") {
            for list in extensions {
                filters = filters.exclude_extensions(list);
            }
        }
        options.filters = filters;

        if matches.get_flag("per-file") {
            options.per_file = true;
        }

        if let Some(path) = matches.get_one::<PathBuf>("output-file") {
            output_file = Some(path.clone());
        }

        let format = matches
            .get_one::<String>("format")
            .map(|s| s.parse::<OutputFormat>())
            .transpose()
            .map_err(anyhow::Error::msg)?
            .unwrap_or_default();

        if options.roots.is_empty() {
            bail!("no roots to fingerprint: pass ROOT arguments or [[root]] entries in --config");
        }

        Ok(Settings {
            options,
            format,
            output_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_command;
    use std::fs;
    use tempfile::tempdir;

    fn settings(args: &[&str]) -> anyhow::Result<Settings> {
        let matches = build_command().try_get_matches_from(
            std::iter::once("treesha").chain(args.iter().copied()),
        )?;
        Settings::from_matches(&matches)
    }

    #[test]
    fn test_roots_from_arguments() {
        let s = settings(&["core/src=core", "web/src"]).unwrap();

        assert_eq!(
            s.options.roots,
            vec![
                RootSpec::new("core/src", "core"),
                RootSpec::new("web/src", "web/src"),
            ]
        );
        assert_eq!(s.format, OutputFormat::Text);
        assert_eq!(s.output_file, None);
        assert!(!s.options.per_file);
    }

    #[test]
    fn test_exclusions_are_merged() {
        let s = settings(&[
            "proj",
            "--exclude-folders",
            "bin .git",
            "--exclude-folders",
            "target",
            "--exclude-extensions",
            ".class",
        ])
        .unwrap();

        assert_eq!(s.options.filters.folders, vec!["bin", ".git", "target"]);
        assert_eq!(s.options.filters.extensions, vec![".class"]);
    }

    #[test]
    fn test_flags() {
        let s = settings(&["proj", "--per-file", "--format", "json", "-o", "out.txt"]).unwrap();

        assert!(s.options.per_file);
        assert_eq!(s.format, OutputFormat::Json);
        assert_eq!(s.output_file, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_no_roots_is_an_error() {
        let err = settings(&[]).unwrap_err();

        assert!(err.to_string().contains("no roots"));
    }

    #[test]
    fn test_invalid_root_is_an_error() {
        assert!(settings(&["=label"]).is_err());
    }

    #[test]
    fn test_config_file_with_overrides() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("treesha.toml");
        fs::write(
            &config,
            r#"
exclude_folders = "bin"
output_file = "from-config.txt"

[[root]]
path = "core/src"
label = "core"
"#,
        )
        .unwrap();
        let config = config.to_string_lossy().into_owned();

        let s = settings(&[
            "--config",
            &config,
            "extra",
            "--exclude-folders",
            "gen",
            "-o",
            "cli.txt",
        ])
        .unwrap();

        assert_eq!(s.options.roots.len(), 2);
        assert_eq!(s.options.roots[0].label, "core");
        assert_eq!(s.options.roots[1].label, "extra");
        assert_eq!(s.options.filters.folders, vec!["bin", "gen"]);
        assert_eq!(s.output_file, Some(PathBuf::from("cli.txt")));
    }

    #[test]
    fn test_missing_config_file() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing.toml");
        let missing = missing.to_string_lossy().into_owned();

        assert!(settings(&["--config", &missing, "proj"]).is_err());
    }
}
