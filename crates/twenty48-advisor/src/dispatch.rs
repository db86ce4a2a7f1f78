//! Mode dispatch and response classification.
//!
//! These two functions are the whole of the advisor's per-mode logic.
//! [`dispatch`] decides where a request goes and what it carries;
//! [`classify`] decides what a response means. Everything else in the
//! crate is plumbing.

use twenty48_engine::Direction;
use twenty48_protocol::{Advice, AdvisorMode, AdvisorRequest, AdvisorResponse, BoardSnapshot};

use crate::{AdvisorConfig, AdvisorError};

/// Builds the request for `mode` and picks its endpoint path.
///
/// `last_move` is the move that produced `snapshot`. Coach mode requires
/// it; the other modes ignore it.
///
/// # Errors
/// - [`AdvisorError::MissingPlayerMove`] in coach mode without a last move
/// - [`AdvisorError::Protocol`] if `config.depth` is 0 (an unvalidated config)
pub fn dispatch<'a>(
    config: &'a AdvisorConfig,
    mode: AdvisorMode,
    snapshot: &BoardSnapshot,
    last_move: Option<Direction>,
) -> Result<(&'a str, AdvisorRequest), AdvisorError> {
    let request = AdvisorRequest::new(snapshot.grid, config.depth)?;
    let request = match mode {
        AdvisorMode::Suggest | AdvisorMode::Insight => request,
        AdvisorMode::Coach => {
            request.with_player_move(last_move.ok_or(AdvisorError::MissingPlayerMove)?)
        }
    };
    Ok((config.paths.for_mode(mode), request))
}

/// Turns a raw response into [`Advice`] for the board at `turn`.
///
/// - Suggest and insight need a `best_move`; without one there is no
///   suggestion.
/// - Coach prefers `coach_msg`. Without it, the coaching text is built from
///   `best_move` (see [`coach_fallback`]). With neither there is no
///   suggestion.
///
/// Scores are kept in every mode; unknown score keys are dropped.
pub fn classify(
    mode: AdvisorMode,
    turn: u64,
    response: AdvisorResponse,
) -> Result<Advice, AdvisorError> {
    let scores = response.scored_moves();
    let AdvisorResponse {
        best_move,
        explanation,
        coach_msg,
        ..
    } = response;

    let usable = match mode {
        AdvisorMode::Suggest | AdvisorMode::Insight => best_move.is_some(),
        AdvisorMode::Coach => coach_msg.is_some() || best_move.is_some(),
    };
    if !usable {
        return Err(AdvisorError::NoSuggestion(mode));
    }

    let coaching = match (mode, coach_msg, best_move) {
        (AdvisorMode::Coach, None, Some(best)) => Some(coach_fallback(best, explanation.as_deref())),
        (_, coach_msg, _) => coach_msg,
    };

    Ok(Advice {
        turn,
        mode,
        best_move,
        scores,
        explanation,
        coaching,
    })
}

/// Coaching text for a reply that carries a best move but no `coach_msg`.
///
/// `"The advisor would play {best}."`, followed by the explanation when
/// there is one.
pub fn coach_fallback(best: Direction, explanation: Option<&str>) -> String {
    match explanation.map(str::trim).filter(|e| !e.is_empty()) {
        Some(why) => format!("The advisor would play {best}. {why}"),
        None => format!("The advisor would play {best}."),
    }
}
