use chrono::{DateTime, Utc};
use order_format::{OrderError, SubmissionTicket};
use tracing::warn;

use crate::messages::{EngineToUi, UiToEngine};
use crate::session::{BridgeError, CustomizerSession};

/// Dispatch a UI message to the session and return the response.
///
/// `now` is the host clock, used for submission deadlines.
pub fn dispatch(session: &mut CustomizerSession, msg: UiToEngine, now: DateTime<Utc>) -> EngineToUi {
    match handle_message(session, msg, now) {
        Ok(response) => response,
        Err(e) => error_response(&e),
    }
}

pub fn error_response(error: &BridgeError) -> EngineToUi {
    EngineToUi::Error {
        kind: error.kind().to_string(),
        message: error.to_string(),
    }
}

fn handle_message(
    session: &mut CustomizerSession,
    msg: UiToEngine,
    now: DateTime<Utc>,
) -> Result<EngineToUi, BridgeError> {
    match msg {
        // -- Catalogs --
        UiToEngine::ListRegions | UiToEngine::ListAssets => Ok(EngineToUi::Catalog {
            regions: session.registry().list_regions().to_vec(),
            assets: session.assets(),
        }),

        // -- Design --
        UiToEngine::SelectRegion { region } => {
            let transition = session.select_region(&region)?;
            Ok(EngineToUi::CameraMove {
                transition,
                view: session.view(),
            })
        }

        UiToEngine::SelectAsset { asset_id } => {
            session.select_asset(&asset_id)?;
            state_changed(session)
        }

        UiToEngine::UploadAsset { data_uri } => {
            session.upload_asset(&data_uri)?;
            state_changed(session)
        }

        UiToEngine::ClearStaged => {
            session.clear_staged()?;
            state_changed(session)
        }

        UiToEngine::ApplyStaged => {
            session.apply_staged()?;
            state_changed(session)
        }

        UiToEngine::RemoveApplied { region } => {
            session.remove_applied(&region)?;
            state_changed(session)
        }

        UiToEngine::SetSizeTier { tier } => {
            session.set_size_tier(&tier)?;
            state_changed(session)
        }

        UiToEngine::SetGarmentSize { size } => {
            session.set_garment_size(&size)?;
            state_changed(session)
        }

        UiToEngine::SetGender { gender } => {
            session.set_gender(&gender)?;
            state_changed(session)
        }

        UiToEngine::GetState => state_changed(session),

        // -- Session --
        UiToEngine::SaveSession => Ok(EngineToUi::SessionSaved {
            data: session.save_session()?,
        }),

        UiToEngine::RestoreSession => {
            let restored = session.restore_session()?;
            Ok(EngineToUi::SessionRestored {
                restored,
                view: session.view(),
                decals: session.decals()?,
            })
        }

        // -- Checkout --
        UiToEngine::BeginCheckout { form, encoding } => {
            let prepared = session.begin_checkout(form, encoding, now)?;
            Ok(EngineToUi::SubmitReady {
                ticket: prepared.ticket.0,
                content_type: prepared.content_type.to_string(),
                body: prepared.body,
            })
        }

        UiToEngine::SubmissionCompleted { ticket, response } => {
            let accepted = session.complete_submission(SubmissionTicket(ticket), &response)?;
            Ok(EngineToUi::OrderAccepted {
                redirect: accepted.redirect,
            })
        }

        UiToEngine::SubmissionErrored { ticket, reason } => {
            Err(session.submission_errored(SubmissionTicket(ticket), &reason))
        }

        UiToEngine::CheckTimeout => match session.check_timeout(now) {
            Some(failure) => {
                warn!("order submission expired");
                Err(OrderError::SubmissionFailed(failure).into())
            }
            None => state_changed(session),
        },
    }
}

fn state_changed(session: &CustomizerSession) -> Result<EngineToUi, BridgeError> {
    Ok(EngineToUi::StateChanged {
        view: session.view(),
        decals: session.decals()?,
    })
}
