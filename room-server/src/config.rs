use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub words_file: String,
    pub public_dir: String,
    pub room_code_length: usize,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("Invalid PORT"),
            words_file: env::var("WORDS_FILE").unwrap_or_else(|_| "./words.txt".to_string()),
            public_dir: env::var("PUBLIC_DIR").unwrap_or_else(|_| "./public".to_string()),
            room_code_length: env::var("ROOM_CODE_LENGTH")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("Invalid ROOM_CODE_LENGTH"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
