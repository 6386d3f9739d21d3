use serde::{Deserialize, Serialize};

use common::{
    context::GeneralContext,
    entities::{
        letter::{IncomingLetter, OutgoingLetter},
        user::User,
    },
    error,
};

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterKind {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentLetter {
    pub kind: LetterKind,
    pub id: String,
    pub nomor_surat: String,
    pub tanggal_surat: String,
    pub perihal: String,
    pub created_at: Option<i64>,
}

impl From<IncomingLetter> for RecentLetter {
    fn from(letter: IncomingLetter) -> Self {
        Self {
            kind: LetterKind::Incoming,
            id: letter.id.to_hex(),
            nomor_surat: letter.nomor_surat,
            tanggal_surat: letter.tanggal_surat,
            perihal: letter.perihal,
            created_at: letter.created_at,
        }
    }
}

impl From<OutgoingLetter> for RecentLetter {
    fn from(letter: OutgoingLetter) -> Self {
        Self {
            kind: LetterKind::Outgoing,
            id: letter.id.to_hex(),
            nomor_surat: letter.nomor_surat,
            tanggal_surat: letter.tanggal_surat,
            perihal: letter.perihal,
            created_at: letter.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Counts {
    pub users: usize,
    pub incoming: usize,
    pub outgoing: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Dashboard {
    pub counts: Counts,
    pub recent: Vec<RecentLetter>,
}

pub struct DashboardService {
    context: GeneralContext,
}

impl DashboardService {
    pub fn new(context: GeneralContext) -> Self {
        Self { context }
    }

    /// One-shot aggregation over full collections: per-kind counts plus the
    /// most recent letters of both kinds merged. Records without a creation
    /// timestamp sort as oldest.
    pub async fn get(&self) -> error::Result<Dashboard> {
        self.context.auth()?;

        let users = self
            .context
            .try_get_repository::<User>()?
            .find_all()
            .await?;
        let incoming = self
            .context
            .try_get_repository::<IncomingLetter>()?
            .find_all()
            .await?;
        let outgoing = self
            .context
            .try_get_repository::<OutgoingLetter>()?
            .find_all()
            .await?;

        let counts = Counts {
            users: users.len(),
            incoming: incoming.len(),
            outgoing: outgoing.len(),
        };

        let mut recent: Vec<RecentLetter> = incoming
            .into_iter()
            .map(RecentLetter::from)
            .chain(outgoing.into_iter().map(RecentLetter::from))
            .collect();

        recent.sort_by_key(|letter| std::cmp::Reverse(letter.created_at.unwrap_or(0)));
        recent.truncate(RECENT_LIMIT);

        Ok(Dashboard { counts, recent })
    }
}
