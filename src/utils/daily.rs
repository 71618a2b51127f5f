use log::{debug, error, info};
use regex::Regex;
use reqwest::blocking;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

pub const DAILY_URL: &str = "https://www.tomsguide.com/news/what-is-todays-wordle-answer";
pub const DAILY_WORD_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    Network(String),
    Status(u16),
    NotFound,
    WrongLength(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "Network error: {e}"),
            FetchError::Status(code) => write!(f, "Network error: server answered {code}"),
            FetchError::NotFound => write!(
                f,
                "Could not find today's word. The site format may have changed."
            ),
            FetchError::WrongLength(word) => write!(
                f,
                "Parsed word '{word}' is not {DAILY_WORD_LEN} letters."
            ),
        }
    }
}

/// Reduces an HTML page to its visible text.
pub fn html_to_text(html: &str) -> String {
    let Ok(blocks) = Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)>")
    else {
        return html.to_string();
    };
    let Ok(tags) = Regex::new(r"(?s)<[^>]*>") else {
        return html.to_string();
    };

    let text = blocks.replace_all(html, " ");
    let text = tags.replace_all(&text, " ");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, &str); 14] = [
        ("&nbsp;", " "),
        ("&#160;", " "),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&#x27;", "'"),
        ("&apos;", "'"),
        ("&rsquo;", "’"),
        ("&#8217;", "’"),
        ("&#x2019;", "’"),
        ("&lsquo;", "‘"),
        ("&mdash;", "—"),
        ("&ndash;", "–"),
        ("&hellip;", "…"),
        // last so an escaped entity is not decoded twice
        ("&amp;", "&"),
    ];
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, ch)| acc.replace(entity, ch))
}

/// Finds the answer in text shaped like "Drumroll, please ... it's WORD".
/// Dashes, an ellipsis or an emoji may sit between the two halves and the
/// apostrophe may be straight or curly.
pub fn extract_word(text: &str) -> Option<String> {
    let re = Regex::new(r"(?i)Drumroll, please\W{0,10}?it['’]s\s*([A-Z]+)").ok()?;
    let caps = re.captures(text)?;
    Some(caps[1].to_ascii_uppercase())
}

pub fn fetch_word_of_the_day() -> Result<String, FetchError> {
    let client = blocking::Client::builder()
        .timeout(Duration::from_secs(15))
        .user_agent(concat!("term_wordle/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let response = client
        .get(DAILY_URL)
        .send()
        .map_err(|e| FetchError::Network(e.to_string()))?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }
    let html = response
        .text()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let text = html_to_text(&html);
    let Some(word) = extract_word(&text) else {
        match text.find("Drumroll") {
            Some(pos) => {
                let context: String = text[pos..].chars().take(150).collect();
                error!("could not parse word of the day near: {context:?}");
            }
            None => error!("'Drumroll' not found in word of the day page"),
        }
        return Err(FetchError::NotFound);
    };

    if word.chars().count() != DAILY_WORD_LEN {
        return Err(FetchError::WrongLength(word));
    }
    info!("fetched word of the day");
    Ok(word)
}

struct DailyResult {
    generation: u64,
    outcome: Result<String, FetchError>,
}

/// Runs word-of-the-day fetches off the UI thread. Each request carries a
/// generation; results from superseded generations are dropped.
pub struct DailyFetcher {
    generation: u64,
    pending: bool,
    tx: Sender<DailyResult>,
    rx: Receiver<DailyResult>,
}

impl Default for DailyFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DailyFetcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        DailyFetcher {
            generation: 0,
            pending: false,
            tx,
            rx,
        }
    }

    pub fn request<F>(&mut self, fetch: F)
    where
        F: FnOnce() -> Result<String, FetchError> + Send + 'static,
    {
        self.generation += 1;
        self.pending = true;
        let generation = self.generation;
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = fetch();
            // the receiver only goes away when the app quits
            let _ = tx.send(DailyResult {
                generation,
                outcome,
            });
        });
    }

    /// Makes every in-flight request stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Result of the current request, if it has arrived.
    pub fn poll(&mut self) -> Option<Result<String, FetchError>> {
        let mut latest = None;
        while let Ok(result) = self.rx.try_recv() {
            if result.generation != self.generation {
                debug!(
                    "dropping stale word of the day result (generation {} < {})",
                    result.generation, self.generation
                );
                continue;
            }
            self.pending = false;
            latest = Some(result.outcome);
        }
        latest
    }

    #[cfg(test)]
    fn wait(&mut self) -> Option<Result<String, FetchError>> {
        for _ in 0..200 {
            if let Some(outcome) = self.poll() {
                return Some(outcome);
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }
}
