use scribble_core::GameSettings;
use std::env;
use std::str::FromStr;

/// Where room records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("Unknown store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub words_file: Option<String>,
    pub total_rounds: u32,
    pub choose_seconds: u32,
    pub draw_seconds: u32,
    pub word_choices: usize,
    pub room_sweep_seconds: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .expect("Invalid PORT"),
            store_backend: env::var("STORE_BACKEND")
                .unwrap_or_else(|_| "memory".to_string())
                .parse()
                .expect("Invalid STORE_BACKEND"),
            words_file: env::var("WORDS_FILE").ok().filter(|path| !path.is_empty()),
            total_rounds: env::var("TOTAL_ROUNDS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("Invalid TOTAL_ROUNDS"),
            choose_seconds: env::var("CHOOSE_SECONDS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .expect("Invalid CHOOSE_SECONDS"),
            draw_seconds: env::var("DRAW_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("Invalid DRAW_SECONDS"),
            word_choices: env::var("WORD_CHOICES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("Invalid WORD_CHOICES"),
            room_sweep_seconds: env::var("ROOM_SWEEP_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("Invalid ROOM_SWEEP_SECONDS"),
        }
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            total_rounds: self.total_rounds,
            choose_seconds: self.choose_seconds,
            draw_seconds: self.draw_seconds,
            word_choices: self.word_choices,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
