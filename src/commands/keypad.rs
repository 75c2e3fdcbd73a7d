use crate::OutputFormat;
use crate::config::Config;
use crate::entry::EntryMode;
use crate::entry::format::format_total;
use crate::picker::{KeyEvent, Picker, PickerView, SavedPicker};
use crate::platform;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    view: &'a PickerView,
    theme: Option<&'a str>,
}

fn entry_mode(config: &Config) -> EntryMode {
    EntryMode::from_hide_seconds(config.picker.hide_seconds)
}

/// Rebuild the picker from saved state, falling back to the configured theme.
fn load_picker(config: &Config, saved: Option<SavedPicker>) -> Picker {
    let mut picker = match saved {
        Some(saved) => Picker::restore(entry_mode(config), Some(saved)),
        None => Picker::from_config(&config.picker),
    };
    if picker.theme().is_none() {
        picker.set_theme(config.picker.theme.clone());
    }
    picker
}

/// Load the saved picker under the state lock, apply `f`, save it back.
fn with_picker<F>(config: &Config, f: F) -> Result<Picker>
where
    F: FnOnce(&mut Picker) -> Result<()>,
{
    let file = platform::state_file(config.state.state_dir_override.as_deref())?;

    let mut picker = file.update(|state| {
        let mut picker = load_picker(config, state.picker.take());
        f(&mut picker)?;
        state.store_picker(picker.save());
        Ok(picker)
    })?;

    // A cleared theme is saved as cleared but shown as the configured one
    if picker.theme().is_none() {
        picker.set_theme(config.picker.theme.clone());
    }
    Ok(picker)
}

fn print_picker(picker: &Picker, format: OutputFormat) -> Result<()> {
    let view = picker.view();
    match format {
        OutputFormat::Json => {
            let output = Output {
                view: &view,
                theme: picker.theme(),
            };
            let json = serde_json::to_string_pretty(&output).context("Failed to serialize view")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("{}", view.text);
            println!("Total: {} ({}s)", format_total(view.total_seconds), view.total_seconds);
            if let Some(theme) = picker.theme() {
                println!("Theme: {}", theme);
            }
        }
    }
    Ok(())
}

/// Press a sequence of keys. All keys are parsed before any is applied.
pub fn press(config: &Config, keys: &[String], format: OutputFormat) -> Result<()> {
    let events = keys
        .iter()
        .map(|k| k.parse::<KeyEvent>())
        .collect::<Result<Vec<_>, _>>()?;

    let picker = with_picker(config, |picker| {
        for event in events {
            if !picker.handle(event) {
                tracing::info!(?event, "key had no effect");
            }
        }
        Ok(())
    })?;
    print_picker(&picker, format)
}

pub fn delete(config: &Config, format: OutputFormat) -> Result<()> {
    let picker = with_picker(config, |picker| {
        picker.handle(KeyEvent::Delete);
        Ok(())
    })?;
    print_picker(&picker, format)
}

pub fn clear(config: &Config, format: OutputFormat) -> Result<()> {
    let picker = with_picker(config, |picker| {
        picker.handle(KeyEvent::Clear);
        Ok(())
    })?;
    print_picker(&picker, format)
}

pub fn set(
    config: &Config,
    hours: u32,
    minutes: u32,
    seconds: u32,
    strict: bool,
    format: OutputFormat,
) -> Result<()> {
    let strict = strict || config.picker.strict;
    let picker = with_picker(config, |picker| {
        if strict {
            picker.set_time_checked(hours, minutes, seconds)?;
        } else {
            picker.set_time(hours, minutes, seconds);
        }
        Ok(())
    })?;
    print_picker(&picker, format)
}

/// Set the theme id. `None` drops the saved id, so the configured
/// `picker.theme` (if any) applies again.
pub fn theme(config: &Config, name: Option<String>, format: OutputFormat) -> Result<()> {
    let picker = with_picker(config, |picker| {
        picker.set_theme(name);
        Ok(())
    })?;
    print_picker(&picker, format)
}

/// Print the saved picker without taking the lock or writing anything.
pub fn show(config: &Config, format: OutputFormat) -> Result<()> {
    let file = platform::state_file(config.state.state_dir_override.as_deref())?;
    let state = file.read()?;
    let picker = load_picker(config, state.picker);
    print_picker(&picker, format)
}
