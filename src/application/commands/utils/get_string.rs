use serenity::all::{CommandDataOption, CommandDataOptionValue};

/// Extract a string option from a slash command by name
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options.iter().find(|opt| opt.name == name).and_then(|opt| {
        if let CommandDataOptionValue::String(s) = &opt.value {
            Some(s.clone())
        } else {
            None
        }
    })
}

/// Extract a channel option from a slash command by name, as a raw ID string
pub fn get_channel_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options.iter().find(|opt| opt.name == name).and_then(|opt| {
        if let CommandDataOptionValue::Channel(channel_id) = &opt.value {
            Some(channel_id.get().to_string())
        } else {
            None
        }
    })
}
