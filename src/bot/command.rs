use std::str::FromStr;

/// A chat command or button interaction, already separated from its transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Latest { community: String },
    Ask { question: String },
    /// A button press carrying the button's `custom_id`.
    Interaction { custom_id: String },
}

impl FromStr for Command {
    type Err = String;

    /// Parse the slash syntax used by the console adapter, e.g. `/latest scams`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.trim_start_matches('/').to_ascii_lowercase().as_str() {
            "ping" => Ok(Command::Ping),
            "latest" if !rest.is_empty() => Ok(Command::Latest {
                community: rest.to_string(),
            }),
            "latest" => Err("usage: /latest <subreddit>".to_string()),
            "ask" if !rest.is_empty() => Ok(Command::Ask {
                question: rest.to_string(),
            }),
            "ask" => Err("usage: /ask <question>".to_string()),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}
