//! Teams: display identity, money pool, and player roster.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

use super::player::Player;

/// Money amounts. Balances never go below zero.
pub type Money = u32;

/// Index of a team within its game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u8);

impl TeamId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Single-letter label used in board renderings: team 0 is 'A'.
    pub fn letter(self) -> char {
        (b'A' + self.0 % 26) as char
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A coalition of players sharing a money pool and a color.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    id: TeamId,
    name: String,
    color: Color,
    money: Money,
    players: Vec<Player>,
}

impl Team {
    /// Creates an empty team with no money.
    pub fn new(id: TeamId, name: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            money: 0,
            players: Vec::new(),
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn money(&self) -> Money {
        self.money
    }

    /// Players in registration order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, slot: usize) -> Option<&Player> {
        self.players.get(slot)
    }

    pub fn player_mut(&mut self, slot: usize) -> Option<&mut Player> {
        self.players.get_mut(slot)
    }

    /// Registers a player and returns its slot within the team.
    ///
    /// The player must have been created for this team, and its name must
    /// not already be on the roster.
    pub fn add_player(&mut self, player: Player) -> Result<usize, GameError> {
        if player.team() != self.id {
            return Err(GameError::InvalidArgumentValue(format!(
                "player '{}' belongs to team {}, not team {}",
                player.name(),
                player.team(),
                self.id
            )));
        }
        if self.players.iter().any(|p| p.name() == player.name()) {
            return Err(GameError::DuplicateEntity(format!(
                "player '{}' in team '{}'",
                player.name(),
                self.name
            )));
        }
        self.players.push(player);
        Ok(self.players.len() - 1)
    }

    /// Sets the balance outright. It must lie within `[0, limit]`.
    pub fn set_money(&mut self, amount: Money, limit: Money) -> Result<(), GameError> {
        if amount > limit {
            return Err(GameError::InvariantViolation(format!(
                "team '{}' balance {} would exceed the money limit {}",
                self.name, amount, limit
            )));
        }
        self.money = amount;
        Ok(())
    }

    /// Adds to the balance. Fails without change if the result would exceed `limit`.
    pub fn deposit(&mut self, amount: Money, limit: Money) -> Result<Money, GameError> {
        let total = self
            .money
            .checked_add(amount)
            .filter(|total| *total <= limit)
            .ok_or_else(|| {
                GameError::InvariantViolation(format!(
                    "team '{}' balance {} + {} would exceed the money limit {}",
                    self.name, self.money, amount, limit
                ))
            })?;
        self.money = total;
        Ok(total)
    }

    /// Takes from the balance. Fails without change if the balance is too small.
    pub fn withdraw(&mut self, amount: Money) -> Result<Money, GameError> {
        let rest = self.money.checked_sub(amount).ok_or_else(|| {
            GameError::InvariantViolation(format!(
                "team '{}' balance {} cannot cover {}",
                self.name, self.money, amount
            ))
        })?;
        self.money = rest;
        Ok(rest)
    }
}
