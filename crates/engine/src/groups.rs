//! Groups and their members.
//!
//! A [`Group`] always holds at least one [`Member`]: the constructor rejects
//! empty member lists so split and balance code never has to.

use std::collections::HashMap;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    id: String,
    name: String,
    members: Vec<Member>,
}

impl Group {
    /// Builds a group, failing with [`EngineError::InvalidGroup`] when
    /// `members` is empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        members: Vec<Member>,
    ) -> ResultEngine<Self> {
        let id = id.into();
        if members.is_empty() {
            return Err(EngineError::InvalidGroup(format!(
                "group '{id}' has no members"
            )));
        }
        Ok(Self {
            id,
            name: name.into(),
            members,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in the order the backend returned them.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.member(member_id).is_some()
    }

    /// `true` for groups with a single member, where balances make no sense.
    pub fn is_solo(&self) -> bool {
        self.members.len() == 1
    }

    pub(crate) fn first_member(&self) -> &Member {
        // Non-empty by construction.
        &self.members[0]
    }
}

/// Resolves a member id to a display name.
pub trait NameLookup {
    fn name_of(&self, member_id: &str) -> Option<&str>;
}

impl NameLookup for Group {
    fn name_of(&self, member_id: &str) -> Option<&str> {
        self.member(member_id).map(|m| m.name.as_str())
    }
}

impl NameLookup for [Group] {
    fn name_of(&self, member_id: &str) -> Option<&str> {
        self.iter().find_map(|group| group.name_of(member_id))
    }
}

impl NameLookup for HashMap<String, String> {
    fn name_of(&self, member_id: &str) -> Option<&str> {
        self.get(member_id).map(String::as_str)
    }
}
