//! Domain model structs exchanged with the HTTP layer.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the response envelopes.  The wire field names (`ID`,
//! `UserID`, ...) are pinned with explicit renames because existing clients
//! of the service expect them exactly like that.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique ID, allocated by the store.
    #[serde(rename = "ID")]
    pub id: i64,
    /// Unique display name, enforced by lookup-before-create.
    #[serde(rename = "Username")]
    pub username: String,
    /// Stored for the clients but never flipped by any command.
    #[serde(rename = "IsOnline")]
    pub is_online: bool,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One stored copy of a message exchange.
///
/// Every send inserts two of these: the sender's copy (`from_me == true`)
/// and the receiver's copy (`from_me == false`), with `user_id` and
/// `to_user_id` swapped between them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique ID from the shared message sequence.
    #[serde(rename = "ID")]
    pub id: i64,
    /// Message content, may be empty.
    #[serde(rename = "Text")]
    pub text: String,
    /// Owner of this stored copy, not necessarily the author.
    #[serde(rename = "UserID")]
    pub user_id: i64,
    /// Counterpart user, used for delivery filtering.
    #[serde(rename = "ToUserID")]
    pub to_user_id: i64,
    #[serde(rename = "FromMe")]
    pub from_me: bool,
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

/// A controllable device slot.  IDs are supplied by the caller, never
/// allocated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Device {
    #[serde(rename = "ID")]
    pub id: i64,
    /// Last commanded or reported value.
    #[serde(rename = "Value")]
    pub value: i64,
    /// Last commanded or reported text.
    #[serde(rename = "Text")]
    pub text: String,
}
