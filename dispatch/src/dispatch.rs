//! End-to-end dispatch: argv in, typed [`DispatchResult`] out.

use std::sync::Arc;

use command_dispatch_core::{DispatchConfig, DispatchError, DispatchResult, FlagContext, Result};
use tracing::debug;

use crate::boundary::split_argv;
use crate::resolve::resolve_command;
use crate::tokenize::collect_flags;
use crate::validate::{parse_options, validate_args, validate_flags};

/// Dispatches `argv` against `config`.
///
/// Steps, in order: split argv, parse global flags, build the command
/// table, resolve the command, parse command flags, validate positional
/// arguments. Unknown global flags are not checked when the config has a
/// default command; unknown command flags always are (unless
/// [`allow_unknown_flags`](DispatchConfig::allow_unknown_flags) is set).
///
/// # Errors
///
/// - [`DispatchError::MalformedFlag`] for a long flag with an empty key.
/// - [`DispatchError::Validation`] with every issue in the failing region.
/// - [`DispatchError::UnknownCommand`] when no command matches; command flags
///   and arguments are not looked at in that case.
/// - [`DispatchError::Argument`] for the first positional argument that fails.
///
/// # Examples
///
/// ```
/// use command_dispatch::process_config;
/// use command_dispatch_core::*;
/// use serde_json::json;
///
/// let serve = CommandDefinition::new()
///     .with_options(OptionsSchema::new().with_field(
///         "port",
///         Field::number().with_min(1024.0).with_default(json!(3000)),
///     ))
///     .with_args(ArgsSpec::array(Field::string()));
///
/// let config = DispatchConfig::new(CommandTable::new().with_command("serve", serve))
///     .with_global_options(
///         OptionsSchema::new().with_field("verbose", Field::boolean().with_default(json!(false))),
///     );
///
/// let result = process_config(&config, &["--verbose", "serve", "src", "--port=8080"]).unwrap();
/// assert_eq!(result.command_name, "serve");
/// assert_eq!(result.global_options, json!({"verbose": true}));
/// assert_eq!(result.options, json!({"port": 8080}));
/// assert_eq!(result.args, json!(["src"]));
/// ```
pub fn process_config<S: AsRef<str>>(config: &DispatchConfig, argv: &[S]) -> Result<DispatchResult> {
    let argv: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
    let global_schema = config.global_options.as_ref();

    let regions = split_argv(&argv, global_schema, &config.global_aliases)?;
    debug!(
        boundary = regions.global_flags.len(),
        path = ?regions.command_path,
        "Split argv"
    );

    let global_flags = collect_flags(regions.global_flags, &config.global_aliases)?;
    let global_issues = if config.default_command.is_some() {
        // Preserved coupling: a default command disables the global unknown-flag check.
        debug!("Default command configured, skipping global unknown-flag check");
        Vec::new()
    } else {
        validate_flags(
            &global_flags,
            global_schema,
            FlagContext::Global,
            config.allow_unknown_flags,
        )
    };
    let global_options =
        parse_options(&global_flags, global_schema, FlagContext::Global, global_issues)?;

    let table = config.commands.materialize(&global_options, global_schema);
    let resolved = resolve_command(
        regions.command_path,
        &table,
        config.default_command.as_deref(),
    )?;
    let command = resolved.command;
    let positional = regions
        .command_path
        .get(resolved.path_length..)
        .unwrap_or_default();

    let command_flags = collect_flags(regions.command_flags, &command.option_aliases)?;
    let command_issues = validate_flags(
        &command_flags,
        command.options.as_ref(),
        FlagContext::Command,
        config.allow_unknown_flags,
    );
    let options = parse_options(
        &command_flags,
        command.options.as_ref(),
        FlagContext::Command,
        command_issues,
    )?;

    let args = validate_args(&command.args, positional).map_err(DispatchError::Argument)?;

    Ok(DispatchResult {
        command_name: command.canonical_name().to_string(),
        command: command.clone(),
        path_length: resolved.path_length,
        global_options,
        options,
        args,
    })
}

/// Dispatches `argv` and runs the matched command's action.
///
/// # Errors
///
/// Everything [`process_config`] returns, plus
/// [`DispatchError::MissingAction`] when the command has no action and
/// [`DispatchError::Action`] when the action fails.
pub fn run<S: AsRef<str>>(config: &DispatchConfig, argv: &[S]) -> Result<DispatchResult> {
    let result = process_config(config, argv)?;
    let action = result
        .command
        .action()
        .map(Arc::clone)
        .ok_or_else(|| DispatchError::MissingAction(result.command_name.clone()))?;

    action(&result).map_err(|source| DispatchError::Action {
        command: result.command_name.clone(),
        source,
    })?;

    Ok(result)
}

/// A configuration that passed definition-time validation.
///
/// # Examples
///
/// ```
/// use command_dispatch::Dispatcher;
/// use command_dispatch_core::*;
///
/// let config = DispatchConfig::new(CommandTable::new().with_command("build", CommandDefinition::new()))
///     .with_default_command("build");
/// let dispatcher = Dispatcher::new(config).unwrap();
///
/// let result = dispatcher.dispatch(&[] as &[&str]).unwrap();
/// assert_eq!(result.command_name, "build");
/// assert_eq!(result.path_length, 0);
///
/// let bad = DispatchConfig::new(CommandTable::new()).with_default_command("build");
/// assert!(matches!(Dispatcher::new(bad), Err(DispatchError::Definition(_))));
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    /// Validates `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Definition`] with the first problem found by
    /// [`DispatchConfig::validate`].
    pub fn new(config: DispatchConfig) -> Result<Self> {
        match config.validate().into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(Self { config }),
        }
    }

    /// The wrapped configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// See [`process_config`].
    pub fn dispatch<S: AsRef<str>>(&self, argv: &[S]) -> Result<DispatchResult> {
        process_config(&self.config, argv)
    }

    /// See [`run`].
    pub fn run<S: AsRef<str>>(&self, argv: &[S]) -> Result<DispatchResult> {
        run(&self.config, argv)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use command_dispatch_core::{
        AliasMap, ArgsSpec, CommandDefinition, CommandSource, CommandTable, Field, OptionsSchema,
    };
    use serde_json::json;

    use super::*;

    #[test]
    fn test_command_flag_aliases_are_command_scoped() {
        let table = CommandTable::new().with_command(
            "serve",
            CommandDefinition::new()
                .with_options(OptionsSchema::new().with_field("port", Field::number()))
                .with_option_aliases(AliasMap::new().with_alias("p", "port"))
                .unwrap(),
        );
        let config = DispatchConfig::new(table)
            .with_global_options(OptionsSchema::new().with_field("profile", Field::string().optional()))
            .with_global_aliases(AliasMap::new().with_alias("p", "profile"))
            .unwrap();

        let result = process_config(&config, &["-p=dev", "serve", "-p=8080"]).unwrap();
        assert_eq!(result.global_options, json!({"profile": "dev"}));
        assert_eq!(result.options, json!({"port": 8080}));
    }

    #[test]
    fn test_factory_sees_typed_global_options() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in_factory = Arc::clone(&seen);
        let source = CommandSource::factory(move |globals, schema| {
            if let Ok(mut slot) = seen_in_factory.lock() {
                *slot = Some((globals.clone(), schema.map(|s| s.len())));
            }
            CommandTable::new().with_command("build", CommandDefinition::new())
        });
        let config = DispatchConfig::new(source).with_global_options(
            OptionsSchema::new().with_field("jobs", Field::number().with_default(json!(1))),
        );

        process_config(&config, &["--jobs=4", "build"]).unwrap();
        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, Some((json!({"jobs": 4}), Some(1))));
    }

    #[test]
    fn test_global_failure_stops_before_resolution() {
        let config = DispatchConfig::new(CommandTable::new())
            .with_global_options(OptionsSchema::new().with_field("jobs", Field::number().optional()));

        let err = process_config(&config, &["--jobs=many", "nope"]).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Validation {
                context: FlagContext::Global,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_command_skips_flag_validation() {
        let config = DispatchConfig::new(
            CommandTable::new().with_command("serve", CommandDefinition::new()),
        );
        let err = process_config(&config, &["nope", "--bogus"]).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand { .. }));
    }

    #[test]
    fn test_argument_failure_is_reported() {
        let table = CommandTable::new().with_command(
            "scale",
            CommandDefinition::new().with_args(ArgsSpec::single(Field::number().integer())),
        );
        let err = process_config(&DispatchConfig::new(table), &["scale", "2.5"]).unwrap_err();
        match err {
            DispatchError::Argument(failure) => assert_eq!(failure.path, vec!["0".to_string()]),
            other => panic!("expected argument failure, got {other:?}"),
        }
    }

    #[test]
    fn test_run_invokes_action() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let table = CommandTable::new().with_command(
            "greet",
            CommandDefinition::new()
                .with_args(ArgsSpec::single(Field::string()))
                .with_action(move |result| {
                    let name: String = result.args_as()?;
                    recorded.lock().map_err(|e| e.to_string())?.push(name);
                    Ok(())
                }),
        );

        run(&DispatchConfig::new(table), &["greet", "ada"]).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["ada".to_string()]);
    }

    #[test]
    fn test_run_without_action_fails() {
        let table = CommandTable::new().with_command("noop", CommandDefinition::new());
        let err = run(&DispatchConfig::new(table), &["noop"]).unwrap_err();
        assert!(matches!(err, DispatchError::MissingAction(name) if name == "noop"));
    }

    #[test]
    fn test_run_wraps_action_error() {
        let table = CommandTable::new().with_command(
            "fail",
            CommandDefinition::new().with_action(|_| Err("boom".into())),
        );
        let err = run(&DispatchConfig::new(table), &["fail"]).unwrap_err();
        assert_eq!(err.to_string(), "command \"fail\" failed: boom");
    }
}
