//! DTOs for decoding Steam Web API responses.
//!
//! Every endpoint wraps its payload in a top-level `response` object. The
//! adapter decodes into these shapes first and maps to domain records in one
//! pass, defaulting fields Steam omits.

use serde::Deserialize;

use crate::domain::ports::{CatalogEntry, ReactionTally, VoteRecord};
use crate::domain::{ProfileSummary, SteamId, VanityResolution};

/// Steam's `success` value for a resolved vanity name.
const RESOLVE_SUCCESS: i64 = 1;

/// 64-bit identifier Steam may send as a string or a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Id64Dto {
    Number(u64),
    Text(String),
}

impl Id64Dto {
    fn value(&self) -> Result<u64, String> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| format!("identifier `{raw}` is not a 64-bit integer")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    pub(super) response: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResolveVanityDto {
    #[serde(default)]
    success: i64,
    steamid: Option<Id64Dto>,
}

impl ResolveVanityDto {
    pub(super) fn into_resolution(self) -> Result<VanityResolution, String> {
        if self.success != RESOLVE_SUCCESS {
            return Ok(VanityResolution::unresolved());
        }
        let Some(raw) = self.steamid else {
            return Ok(VanityResolution::unresolved());
        };
        match raw.value()? {
            0 => Ok(VanityResolution::unresolved()),
            id => Ok(VanityResolution::resolved(SteamId::new(id))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PlayerSummariesDto {
    #[serde(default)]
    players: Vec<PlayerDto>,
}

#[derive(Debug, Deserialize)]
struct PlayerDto {
    steamid: Id64Dto,
    #[serde(default)]
    personaname: String,
    #[serde(default)]
    avatarfull: String,
}

impl PlayerSummariesDto {
    pub(super) fn into_profile(self) -> Result<Option<ProfileSummary>, String> {
        let Some(player) = self.players.into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(ProfileSummary {
            steam_id: SteamId::new(player.steamid.value()?),
            display_name: player.personaname,
            avatar_url: player.avatarfull,
        }))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UserFilesDto {
    #[serde(default)]
    publishedfiledetails: Vec<PublishedFileDto>,
}

#[derive(Debug, Deserialize)]
struct PublishedFileDto {
    publishedfileid: Id64Dto,
    #[serde(default)]
    title: String,
    #[serde(default)]
    preview_url: String,
    #[serde(default)]
    views: u64,
    #[serde(default)]
    subscriptions: u64,
    #[serde(default)]
    favorited: u64,
    #[serde(default)]
    vote_data: VoteDataDto,
    reactions: Option<Vec<ReactionDto>>,
}

#[derive(Debug, Default, Deserialize)]
struct VoteDataDto {
    #[serde(default)]
    score: f32,
    votes_up: Option<u64>,
    votes_down: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ReactionDto {
    reactionid: u32,
    #[serde(default)]
    count: u64,
}

impl UserFilesDto {
    pub(super) fn into_catalog(self) -> Result<Vec<CatalogEntry>, String> {
        self.publishedfiledetails
            .into_iter()
            .map(PublishedFileDto::into_entry)
            .collect()
    }
}

impl PublishedFileDto {
    fn into_entry(self) -> Result<CatalogEntry, String> {
        Ok(CatalogEntry {
            id: self.publishedfileid.value()?,
            title: self.title,
            preview_url: self.preview_url,
            views: self.views,
            subscriptions: self.subscriptions,
            favorited: self.favorited,
            vote: VoteRecord {
                score: self.vote_data.score,
                votes_up: self.vote_data.votes_up,
                votes_down: self.vote_data.votes_down,
            },
            reactions: self.reactions.map(|reactions| {
                reactions
                    .into_iter()
                    .map(|reaction| ReactionTally {
                        reaction_id: reaction.reactionid,
                        count: reaction.count,
                    })
                    .collect()
            }),
        })
    }
}
