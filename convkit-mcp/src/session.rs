//! Per-connection favorites and history
//!
//! This state belongs to the server, not to the engine. It lives for one
//! stdio session and is never written to disk.

use std::collections::VecDeque;

use convkit_core::{format_fixed, format_plain};
use convkit_units::Category;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One completed conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub category: Category,
    pub from_unit: String,
    pub to_unit: String,
    pub value: f64,
    pub result: f64,
}

impl ConversionRecord {
    /// "100 Celsius to Fahrenheit = 212.00"
    pub fn describe(&self, decimals: usize) -> String {
        format!(
            "{} {} to {} = {}",
            format_plain(self.value),
            self.from_unit,
            self.to_unit,
            format_fixed(self.result, decimals)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("favorites are full ({0} entries)")]
    FavoritesFull(usize),

    #[error("no favorite #{index} (have {len})")]
    NoSuchFavorite { index: usize, len: usize },
}

#[derive(Debug)]
pub struct Session {
    favorites: Vec<ConversionRecord>,
    history: VecDeque<ConversionRecord>,
    favorites_limit: usize,
    history_limit: usize,
}

impl Session {
    pub fn new(favorites_limit: usize, history_limit: usize) -> Self {
        Self {
            favorites: Vec::new(),
            history: VecDeque::new(),
            favorites_limit,
            history_limit,
        }
    }

    /// Append to history, evicting the oldest entry past the limit
    pub fn record(&mut self, record: ConversionRecord) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }

    /// Add a favorite and return its 1-based position
    pub fn add_favorite(&mut self, record: ConversionRecord) -> Result<usize, SessionError> {
        if self.favorites.len() >= self.favorites_limit {
            return Err(SessionError::FavoritesFull(self.favorites_limit));
        }
        self.favorites.push(record);
        Ok(self.favorites.len())
    }

    /// Favorite by 1-based position
    pub fn favorite(&self, index: usize) -> Result<&ConversionRecord, SessionError> {
        index
            .checked_sub(1)
            .and_then(|i| self.favorites.get(i))
            .ok_or(SessionError::NoSuchFavorite {
                index,
                len: self.favorites.len(),
            })
    }

    pub fn favorites(&self) -> &[ConversionRecord] {
        &self.favorites
    }

    /// Most recent conversions, newest first
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &ConversionRecord> {
        self.history.iter().rev().take(limit)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clear_history(&mut self) -> usize {
        let cleared = self.history.len();
        self.history.clear();
        cleared
    }
}
