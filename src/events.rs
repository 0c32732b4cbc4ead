// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Inbound client events
//!
//! The client posts loosely-typed JSON objects tagged by a `"Message"` field.
//! [`Event::decode`] turns one payload into a typed variant. Malformed lines
//! inside a batch are skipped; only a payload that cannot be read at all is
//! an error.

use crate::ledger::Holding;
use crate::types::Namespace;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Whether a collection message replaces or adjusts holdings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Full replacement of the namespace
    Overwrite,
    /// Incremental added/removed lists
    Update,
}

/// A `Collection` or `Inventory` message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionUpdate {
    /// Which half of the identity space the message covers
    pub namespace: Namespace,
    /// Replace or adjust
    pub action: SyncAction,
    /// `CardsAdded` lines that decoded cleanly
    pub added: Vec<Holding>,
    /// `CardsRemoved` lines that decoded cleanly
    pub removed: Vec<Holding>,
}

/// Zone a card occupies during a game, from the `Collection` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// The player's champion
    Champion,
    /// Library
    Deck,
    /// Hand
    Hand,
    /// The opponent's champion
    OpposingChampion,
    /// Battlefield
    Play,
    /// Graveyard
    Discard,
    /// Exiled
    Void,
    /// Resource row
    Shard,
    /// Stack
    Chain,
    /// Tunnelled under the deck
    Tunnelled,
    /// Pending effect choice
    ChooseEffect,
}

impl Zone {
    const BITS: [(u32, Zone); 10] = [
        (1, Zone::Deck),
        (2, Zone::Hand),
        (4, Zone::OpposingChampion),
        (8, Zone::Play),
        (16, Zone::Discard),
        (32, Zone::Void),
        (64, Zone::Shard),
        (128, Zone::Chain),
        (256, Zone::Tunnelled),
        (512, Zone::ChooseEffect),
    ];

    /// Decode the power-of-two zone flag; the lowest known bit wins
    #[must_use]
    pub fn from_bits(bits: u32) -> Option<Self> {
        if bits == 0 {
            return Some(Self::Champion);
        }
        Self::BITS
            .iter()
            .find(|(bit, _)| bits & bit != 0)
            .map(|(_, zone)| *zone)
    }

    /// Zones whose churn is too noisy to announce
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Play | Self::Discard | Self::Tunnelled)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Champion => "Champion",
            Self::Deck => "Deck",
            Self::Hand => "Hand",
            Self::OpposingChampion => "Opposing Champion",
            Self::Play => "Play",
            Self::Discard => "Discard",
            Self::Void => "Void",
            Self::Shard => "Shard",
            Self::Chain => "Chain",
            Self::Tunnelled => "Tunnelled",
            Self::ChooseEffect => "Choose Effect",
        };
        f.write_str(name)
    }
}

/// A `CardUpdated` message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardUpdate {
    /// Card name
    pub name: String,
    /// Attack stat, when present
    pub attack: Option<i64>,
    /// Defense stat, when present
    pub defense: Option<i64>,
    /// Resource cost, when present
    pub cost: Option<i64>,
    /// Decoded zone, when the flag is known
    pub zone: Option<Zone>,
}

/// Every message kind the listener understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Collection or inventory resync
    Collection(CollectionUpdate),
    /// A card was drafted from the current pack
    DraftCardPicked {
        /// Identity of the drafted card
        identity: String,
    },
    /// A pack was passed to the player
    DraftPack {
        /// Identities in the pack, in client order
        cards: Vec<String>,
    },
    /// In-game card state change
    CardUpdated(CardUpdate),
    /// A game began
    GameStarted,
    /// A game finished
    GameEnded {
        /// First listed winner
        winner: String,
        /// First listed loser
        loser: String,
    },
    /// Client logged in
    Login {
        /// In-game name, when sent
        user: Option<String>,
    },
    /// Client logged out
    Logout {
        /// In-game name, when sent
        user: Option<String>,
    },
    /// Player profile refreshed
    PlayerUpdated,
    /// A deck was saved
    SaveDeck,
    /// Message kind this listener does not handle
    Unknown(String),
}

impl Event {
    /// Decode one raw request body
    pub fn decode(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(&value)
    }

    /// Decode an already-parsed JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::Decode("payload is not a JSON object".into()))?;
        let kind = object.get("Message").and_then(Value::as_str).unwrap_or_default();

        let event = match kind {
            "Collection" => Self::Collection(decode_collection(object, Namespace::Card)),
            "Inventory" => Self::Collection(decode_collection(object, Namespace::Item)),
            "DraftCardPicked" | "DaraftCardPicked" => {
                let card = object
                    .get("Card")
                    .ok_or_else(|| Error::Decode("DraftCardPicked without Card".into()))?;
                let identity = identity_of(card)
                    .ok_or_else(|| Error::Decode("DraftCardPicked card has no identity".into()))?;
                Self::DraftCardPicked { identity }
            }
            "DraftPack" => Self::DraftPack {
                cards: array(object, "Cards").filter_map(identity_of).collect(),
            },
            "CardUpdated" => Self::CardUpdated(decode_card_update(object)),
            "GameStarted" => Self::GameStarted,
            "GameEnded" => Self::GameEnded {
                winner: first_name(object, "Winners"),
                loser: first_name(object, "Losers"),
            },
            "Login" => Self::Login { user: user(object) },
            "Logout" => Self::Logout { user: user(object) },
            "PlayerUpdated" => Self::PlayerUpdated,
            "SaveDeck" => Self::SaveDeck,
            other => Self::Unknown(other.to_string()),
        };
        Ok(event)
    }

    /// Message kind, for logging
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Collection(update) => match update.namespace {
                Namespace::Card => "Collection",
                Namespace::Item => "Inventory",
            },
            Self::DraftCardPicked { .. } => "DraftCardPicked",
            Self::DraftPack { .. } => "DraftPack",
            Self::CardUpdated(_) => "CardUpdated",
            Self::GameStarted => "GameStarted",
            Self::GameEnded { .. } => "GameEnded",
            Self::Login { .. } => "Login",
            Self::Logout { .. } => "Logout",
            Self::PlayerUpdated => "PlayerUpdated",
            Self::SaveDeck => "SaveDeck",
            Self::Unknown(kind) => kind,
        }
    }
}

fn array<'a>(object: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Value> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

/// Identity of a card object: `Guid.m_Guid`, else a flat `identity` string
fn identity_of(card: &Value) -> Option<String> {
    card.get("Guid")
        .and_then(|guid| guid.get("m_Guid"))
        .or_else(|| card.get("identity"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
}

fn holding_of(card: &Value) -> Option<Holding> {
    let identity = identity_of(card)?;
    let count = match card.get("Count").or_else(|| card.get("count")) {
        None => 1,
        Some(value) => u32::try_from(value.as_u64()?).ok()?,
    };
    let extended = card
        .get("Flags")
        .and_then(Value::as_str)
        .is_some_and(|flags| flags.contains("ExtendedArt"));
    Some(Holding {
        identity,
        count,
        extended,
    })
}

fn holdings(object: &Map<String, Value>, key: &str) -> Vec<Holding> {
    array(object, key)
        .filter_map(|card| {
            let holding = holding_of(card);
            if holding.is_none() {
                debug!(list = key, "skipping malformed collection line");
            }
            holding
        })
        .collect()
}

fn decode_collection(object: &Map<String, Value>, namespace: Namespace) -> CollectionUpdate {
    let action = match object.get("Action").and_then(Value::as_str) {
        Some("Overwrite") => SyncAction::Overwrite,
        _ => SyncAction::Update,
    };
    CollectionUpdate {
        namespace,
        action,
        added: holdings(object, "CardsAdded"),
        removed: holdings(object, "CardsRemoved"),
    }
}

/// Integer field that may arrive as a JSON number or a numeric string
fn int_field(object: &Map<String, Value>, key: &str) -> Option<i64> {
    match object.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn decode_card_update(object: &Map<String, Value>) -> CardUpdate {
    CardUpdate {
        name: object
            .get("Name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        attack: int_field(object, "Attack"),
        defense: int_field(object, "Defense"),
        cost: int_field(object, "Cost"),
        zone: int_field(object, "Collection")
            .and_then(|bits| u32::try_from(bits).ok())
            .and_then(Zone::from_bits),
    }
}

fn first_name(object: &Map<String, Value>, key: &str) -> String {
    array(object, key)
        .find_map(Value::as_str)
        .map(|name| name.trim().to_string())
        .unwrap_or_default()
}

fn user(object: &Map<String, Value>) -> Option<String> {
    object
        .get("User")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .map(String::from)
}
