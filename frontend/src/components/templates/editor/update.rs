//! Update function for the template editor.
//!
//! Elm-style: `update` takes the state, the `Context` and a `Msg`, mutates the
//! state and returns whether to re-render. Network work is spawned here and
//! comes back as further messages; every asynchronous result carries the
//! ticket it was started with and is dropped when a newer request superseded
//! it.
//!
//! Save flow: input check -> extraction -> validation -> (advisory dialog) ->
//! create/update. An invalid or unavailable validation never blocks saving;
//! the author decides.

use common::editor::{EditorBuffer, Effect};
use common::model::validation::ValidationReport;
use common::placeholder::{extract_placeholders, wrap_token};
use common::requests::UpsertTemplateRequest;
use log::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::services::store::RefreshSignal;
use crate::toast::{show_error, show_toast};

use super::helpers::{compute_md5, restore_caret};
use super::messages::Msg;
use super::state::{SaveStage, TemplateEditorComponent, ValidationOutcome};

pub fn update(
    component: &mut TemplateEditorComponent,
    ctx: &Context<TemplateEditorComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::TemplateLoaded(template) => {
            component.loading = false;
            component.original_md5 = Some(compute_md5(&template.html_content));
            component.buffer = EditorBuffer::new(template.html_content.clone());
            component.draft = template.into();
            let template_type = component.draft.template_type;
            let effects = component.session.loaded(template_type, component.buffer.text());
            for effect in effects {
                apply(component, ctx, effect);
            }
            true
        }
        Msg::TemplateLoadFailed(error) => {
            warn!("template could not be loaded: {error}");
            show_error(&format!("Error cargando la plantilla: {error}"));
            ctx.props().on_close.emit(());
            false
        }
        Msg::SchemaLoaded {
            ticket,
            template_type,
            entities,
        } => component.session.schema_loaded(ticket, template_type, entities),
        Msg::SchemaFailed {
            ticket,
            template_type,
            error,
        } => {
            let message = error.clone();
            if !component.session.schema_failed(ticket, template_type, error) {
                return false;
            }
            warn!("placeholder schema for {template_type} failed: {message}");
            show_error("No se pudieron cargar los marcadores disponibles.");
            true
        }

        Msg::SetName(name) => {
            component.draft.name = name;
            component.issues.clear();
            true
        }
        Msg::SetCode(code) => {
            component.draft.code = code;
            component.issues.clear();
            true
        }
        Msg::SetDescription(description) => {
            component.draft.description = description;
            false
        }
        Msg::SetActive(active) => {
            component.draft.is_active = active;
            true
        }
        Msg::SetTemplateType(template_type) => {
            let Some(effect) = component.session.set_template_type(template_type) else {
                return false;
            };
            component.draft.template_type = template_type;
            apply(component, ctx, effect);
            true
        }

        Msg::SetTab(tab) => {
            component.active_tab = tab;
            true
        }
        Msg::UpdateText(text) => {
            if component.buffer.text() == text {
                return false;
            }
            component.buffer.set_text(text);
            component.sync_draft_text();
            component.issues.clear();
            let effect = component.session.text_changed(component.buffer.text());
            apply(component, ctx, effect);
            true
        }
        Msg::CaretMoved { start, end } => {
            component.buffer.set_selection(start, end);
            false
        }
        Msg::SelectEntity(name) => component.session.select_entity(&name),
        Msg::InsertPlaceholder(token) => {
            let caret = component.buffer.insert(&token);
            component.sync_draft_text();
            component.issues.clear();
            restore_caret(&component.textarea_ref, component.buffer.text(), caret);
            let effect = component.session.text_changed(component.buffer.text());
            apply(component, ctx, effect);
            true
        }

        Msg::RunExtraction(ticket) => {
            if !component.session.extraction_is_current(ticket) {
                return false;
            }
            let api = component.api.clone();
            let content = component.buffer.text().to_string();
            let link = ctx.link().clone();
            spawn_local(async move {
                match api.extract_placeholders(&content).await {
                    Ok(names) => link.send_message(Msg::PlaceholdersExtracted { ticket, names }),
                    Err(e) => link.send_message(Msg::ExtractionFailed {
                        ticket,
                        error: e.to_string(),
                    }),
                }
            });
            false
        }
        Msg::PlaceholdersExtracted { ticket, names } => component.session.extracted(ticket, names),
        Msg::ExtractionFailed { ticket, error } => {
            // The previously detected list stays on screen.
            if component.session.extraction_is_current(ticket) {
                warn!("placeholder extraction failed: {error}");
            }
            false
        }

        Msg::Save => {
            if component.is_busy() {
                return false;
            }
            component.sync_draft_text();
            component.issues = component.draft.check();
            if let Some(first) = component.issues.first() {
                show_error(&first.to_string());
                return true;
            }
            component.save_stage = SaveStage::Checking;
            check_placeholders(component, ctx);
            true
        }
        Msg::Validated(report) => {
            if component.save_stage != SaveStage::Checking {
                return false;
            }
            if report.is_valid {
                persist(component, ctx);
            } else {
                component.save_stage = SaveStage::Confirming(ValidationOutcome::Invalid(report));
            }
            true
        }
        Msg::ValidationUnavailable(error) => {
            if component.save_stage != SaveStage::Checking {
                return false;
            }
            warn!("placeholder validation unavailable: {error}");
            component.save_stage = SaveStage::Confirming(ValidationOutcome::Unavailable(error));
            true
        }
        Msg::ConfirmSave => {
            if !matches!(component.save_stage, SaveStage::Confirming(_)) {
                return false;
            }
            persist(component, ctx);
            true
        }
        Msg::DismissValidation => {
            component.save_stage = SaveStage::Idle;
            true
        }
        Msg::Saved(template) => {
            component.save_stage = SaveStage::Idle;
            component.original_md5 = Some(compute_md5(&template.html_content));
            show_toast("Plantilla guardada correctamente.");
            if let Some(bus) = &component.bus {
                bus.publish(RefreshSignal::Templates);
            }
            ctx.props().on_saved.emit(template);
            true
        }
        Msg::SaveFailed(error) => {
            component.save_stage = SaveStage::Idle;
            warn!("template save failed: {error}");
            show_error(&format!("Error al guardar la plantilla: {error}"));
            true
        }
        Msg::Close => {
            let effect = component.session.close();
            apply(component, ctx, effect);
            ctx.props().on_close.emit(());
            false
        }
    }
}

/// Carries out one decision of the editing session.
pub fn apply(
    component: &mut TemplateEditorComponent,
    ctx: &Context<TemplateEditorComponent>,
    effect: Effect,
) {
    match effect {
        Effect::FetchSchema {
            ticket,
            template_type,
        } => {
            let api = component.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                match api.schema_placeholders(template_type).await {
                    Ok(entities) => link.send_message(Msg::SchemaLoaded {
                        ticket,
                        template_type,
                        entities,
                    }),
                    Err(e) => link.send_message(Msg::SchemaFailed {
                        ticket,
                        template_type,
                        error: e.to_string(),
                    }),
                }
            });
        }
        Effect::ExtractAfterQuiet(ticket) => {
            let link = ctx.link().clone();
            component
                .extraction
                .schedule(move || link.send_message(Msg::RunExtraction(ticket)));
        }
        Effect::ExtractNow(ticket) => {
            component.extraction.cancel();
            ctx.link().send_message(Msg::RunExtraction(ticket));
        }
        Effect::CancelExtraction => component.extraction.cancel(),
    }
}

/// Extracts the tokens of the current body on the server (falling back to
/// the local extractor) and validates them.
fn check_placeholders(
    component: &mut TemplateEditorComponent,
    ctx: &Context<TemplateEditorComponent>,
) {
    let api = component.api.clone();
    let content = component.draft.html_content.clone();
    let template_type = component.draft.template_type;
    let link = ctx.link().clone();
    spawn_local(async move {
        let names = match api.extract_placeholders(&content).await {
            Ok(names) => names,
            Err(e) => {
                warn!("server extraction failed before save, using local extraction: {e}");
                extract_placeholders(&content)
            }
        };
        if names.is_empty() {
            link.send_message(Msg::Validated(ValidationReport::valid()));
            return;
        }
        let tokens = names.iter().map(|name| wrap_token(name)).collect();
        match api.validate_placeholders(tokens, template_type).await {
            Ok(report) => link.send_message(Msg::Validated(report)),
            Err(e) => link.send_message(Msg::ValidationUnavailable(e.to_string())),
        }
    });
}

fn persist(component: &mut TemplateEditorComponent, ctx: &Context<TemplateEditorComponent>) {
    component.save_stage = SaveStage::Persisting;
    let api = component.api.clone();
    let id = component.draft.id;
    let body = UpsertTemplateRequest::from(&component.draft);
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = match id {
            Some(id) => api.update(id, &body).await,
            None => api.create(&body).await,
        };
        match result {
            Ok(template) => link.send_message(Msg::Saved(template)),
            Err(e) => link.send_message(Msg::SaveFailed(e.to_string())),
        }
    });
}
