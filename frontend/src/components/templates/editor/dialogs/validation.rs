//! Advisory dialog shown when the placeholders of the body did not pass
//! validation, or when the validation service could not be reached.

use yew::html::Scope;
use yew::prelude::*;

use crate::components::templates::editor::state::{SaveStage, ValidationOutcome};
use crate::components::templates::editor::{Msg, TemplateEditorComponent};

pub fn validation_dialog(
    component: &TemplateEditorComponent,
    link: &Scope<TemplateEditorComponent>,
) -> Html {
    let SaveStage::Confirming(outcome) = &component.save_stage else {
        return html! {};
    };

    let body = match outcome {
        ValidationOutcome::Invalid(report) => html! {
            <>
                <p>
                    { format!(
                        "Los siguientes marcadores no existen para el tipo \"{}\":",
                        component.draft.template_type.label()
                    ) }
                </p>
                <ul class="invalid-placeholders">
                    { for report.invalid().iter().map(|token| html! { <li><code>{ token.clone() }</code></li> }) }
                </ul>
            </>
        },
        ValidationOutcome::Unavailable(error) => html! {
            <>
                <p>{ "No se pudo validar los marcadores de la plantilla." }</p>
                <p class="muted">{ error.clone() }</p>
            </>
        },
    };

    html! {
        <div class="validation-dialog">
            { body }
            <p>{ "¿Desea guardar de todas formas?" }</p>
            <div class="dialog-actions">
                <button class="btn secondary" onclick={link.callback(|_| Msg::DismissValidation)}>
                    { "Volver a editar" }
                </button>
                <button class="btn primary" onclick={link.callback(|_| Msg::ConfirmSave)}>
                    { "Guardar de todas formas" }
                </button>
            </div>
        </div>
    }
}
