//! View rendering for the template editor.
//!
//! Left column: template metadata and the body (editor and preview tabs).
//! Right column: the placeholder panel for the selected type, grouped by
//! entity, plus the list of placeholders detected in the body. Clicking a
//! placeholder inserts it at the caret; the panel buttons act on mousedown
//! with the default prevented so the textarea keeps its selection.

use common::model::place_holder::PlaceholderField;
use common::model::template::TemplateType;
use common::placeholder::wrap_token;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

use super::dialogs::validation::validation_dialog;
use super::helpers::read_selection;
use super::messages::Msg;
use super::state::{EditorTab, SaveStage, TemplateEditorComponent};

pub fn view(component: &TemplateEditorComponent, ctx: &Context<TemplateEditorComponent>) -> Html {
    let link = ctx.link();

    if component.loading {
        return html! {
            <div class="template-editor loading">{ "Cargando plantilla..." }</div>
        };
    }

    html! {
        <div class="template-editor">
            <div class="template-editor-main">
                { build_metadata(component, link) }
                { build_tab_bar(component, link) }
                {
                    match component.active_tab {
                        EditorTab::Editor => build_editor_tab(component, link),
                        EditorTab::Preview => build_preview_tab(component),
                    }
                }
            </div>
            <aside class="template-editor-side">
                { build_placeholder_panel(component, link) }
                { build_detected_list(component) }
            </aside>
            { build_footer(component, link) }
            <YwMaterialTopSheet
                open={matches!(component.save_stage, SaveStage::Confirming(_))}
                title="Validación de marcadores"
            >
                { validation_dialog(component, link) }
            </YwMaterialTopSheet>
        </div>
    }
}

fn build_metadata(
    component: &TemplateEditorComponent,
    link: &Scope<TemplateEditorComponent>,
) -> Html {
    let draft = &component.draft;
    let issue_for = |field: &str| {
        component
            .issues
            .iter()
            .find(|issue| issue.field() == field)
            .map(|issue| html! { <span class="field-error">{ issue.to_string() }</span> })
            .unwrap_or_default()
    };

    html! {
        <div class="template-metadata">
            <label>
                { "Nombre" }
                <input
                    type="text"
                    value={draft.name.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::SetName(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
                { issue_for("name") }
            </label>
            <label>
                { "Código" }
                <input
                    type="text"
                    value={draft.code.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::SetCode(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
                { issue_for("code") }
            </label>
            <label>
                { "Tipo" }
                <select
                    onchange={link.callback(|e: Event| {
                        let value = e.target_unchecked_into::<HtmlSelectElement>().value();
                        Msg::SetTemplateType(value.parse().unwrap_or_default())
                    })}
                >
                    { for TemplateType::ALL.iter().map(|t| html! {
                        <option value={t.as_str()} selected={*t == draft.template_type}>
                            { t.label() }
                        </option>
                    }) }
                </select>
            </label>
            <label>
                { "Descripción" }
                <input
                    type="text"
                    value={draft.description.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::SetDescription(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
            </label>
            <label class="inline">
                <input
                    type="checkbox"
                    checked={draft.is_active}
                    onchange={link.callback(|e: Event| {
                        Msg::SetActive(e.target_unchecked_into::<HtmlInputElement>().checked())
                    })}
                />
                { "Activa" }
            </label>
        </div>
    }
}

/// Editor / preview switch. A red dot marks unsaved changes to the body.
fn build_tab_bar(
    component: &TemplateEditorComponent,
    link: &Scope<TemplateEditorComponent>,
) -> Html {
    let tab_class =
        |tab: EditorTab| classes!("tab-btn", (component.active_tab == tab).then_some("active"));

    html! {
        <div class="tab-bar">
            <button
                class={tab_class(EditorTab::Editor)}
                onclick={link.callback(|_| Msg::SetTab(EditorTab::Editor))}
                style="position: relative;"
            >
                { "Editor" }
                if component.is_dirty() {
                    <span
                        title="Cambios sin guardar"
                        style="position: absolute; top: 4px; right: 6px; width: 8px; height: 8px; background: #e53935; border-radius: 50%;"
                    />
                }
            </button>
            <button
                class={tab_class(EditorTab::Preview)}
                onclick={link.callback(|_| Msg::SetTab(EditorTab::Preview))}
            >
                { "Previsualización" }
            </button>
        </div>
    }
}

fn build_editor_tab(
    component: &TemplateEditorComponent,
    link: &Scope<TemplateEditorComponent>,
) -> Html {
    let caret = |e: Event| {
        let (start, end) = read_selection(&e.target_unchecked_into::<HtmlTextAreaElement>());
        Msg::CaretMoved { start, end }
    };

    html! {
        <textarea
            class="template-body"
            ref={component.textarea_ref.clone()}
            value={component.buffer.text().to_string()}
            spellcheck="false"
            rows={18}
            placeholder="Escriba el contenido HTML de la plantilla. Use {{MARCADOR}} para los datos variables."
            oninput={link.batch_callback(|e: InputEvent| {
                let textarea = e.target_unchecked_into::<HtmlTextAreaElement>();
                let (start, end) = read_selection(&textarea);
                vec![Msg::UpdateText(textarea.value()), Msg::CaretMoved { start, end }]
            })}
            onselect={link.callback(caret)}
            onkeyup={link.callback(move |e: KeyboardEvent| caret(e.into()))}
            onclick={link.callback(move |e: MouseEvent| caret(e.into()))}
            style="width: 100%; font-family: monospace; resize: vertical;"
        />
    }
}

fn build_preview_tab(component: &TemplateEditorComponent) -> Html {
    let rendered = component.session.registry().render_preview(component.buffer.text());
    html! {
        <div class="template-preview">{ Html::from_html_unchecked(AttrValue::from(rendered)) }</div>
    }
}

fn build_placeholder_panel(
    component: &TemplateEditorComponent,
    link: &Scope<TemplateEditorComponent>,
) -> Html {
    let registry = component.session.registry();

    let body = if component.session.schema_loading() {
        html! { <p class="muted">{ "Cargando marcadores..." }</p> }
    } else if let Some(error) = component.session.schema_error() {
        html! { <p class="field-error" title={error.to_string()}>{ "No se pudieron cargar los marcadores." }</p> }
    } else if registry.is_empty() {
        html! { <p class="muted">{ "Este tipo de plantilla no tiene marcadores." }</p> }
    } else {
        html! {
            <>
                <div class="entity-tabs">
                    { for registry.entity_names().map(|name| {
                        let active = registry.active_entity() == Some(name);
                        let selected = name.to_string();
                        html! {
                            <button
                                class={classes!("entity-tab", active.then_some("active"))}
                                onclick={link.callback(move |_| Msg::SelectEntity(selected.clone()))}
                            >
                                { name.to_string() }
                            </button>
                        }
                    }) }
                </div>
                <ul class="placeholder-list">
                    { for registry.active_fields().iter().map(|field| placeholder_button(field, link)) }
                </ul>
            </>
        }
    };

    html! {
        <div class="placeholder-panel">
            <h3>{ format!("Marcadores: {}", component.draft.template_type.label()) }</h3>
            { body }
        </div>
    }
}

fn placeholder_button(field: &PlaceholderField, link: &Scope<TemplateEditorComponent>) -> Html {
    let token = field.placeholder.clone();
    let onmousedown = link.callback(move |e: MouseEvent| {
        e.prevent_default();
        Msg::InsertPlaceholder(token.clone())
    });

    html! {
        <li>
            <button class="placeholder-btn" title={field.description.clone()} {onmousedown}>
                <code>{ field.placeholder.clone() }</code>
                if field.is_required {
                    <span class="required" title="Obligatorio">{ "*" }</span>
                }
            </button>
            <span class="placeholder-meta">
                { field.placeholder_type.label() }
                if !field.example.is_empty() {
                    { format!(" · ej.: {}", field.example) }
                }
            </span>
        </li>
    }
}

/// Placeholders found in the body, each marked as known or unknown for the
/// selected type, plus the required ones still missing.
fn build_detected_list(component: &TemplateEditorComponent) -> Html {
    let registry = component.session.registry();
    let tokens: Vec<String> = component
        .session
        .detected()
        .iter()
        .map(|name| wrap_token(name))
        .collect();
    let missing = registry.missing_required(&tokens);

    html! {
        <div class="detected-placeholders">
            <h3>{ format!("Detectados ({})", tokens.len()) }</h3>
            if tokens.is_empty() {
                <p class="muted">{ "El contenido no usa marcadores." }</p>
            } else {
                <ul>
                    { for tokens.iter().map(|token| {
                        let known = registry.is_empty() || registry.contains(token);
                        html! {
                            <li class={classes!("detected", (!known).then_some("unknown"))}>
                                <code>{ token.clone() }</code>
                                if !known {
                                    <span class="badge">{ "desconocido" }</span>
                                }
                            </li>
                        }
                    }) }
                </ul>
            }
            if !missing.is_empty() {
                <p class="hint">
                    { "Faltan marcadores obligatorios: " }
                    { missing.iter().map(|field| field.placeholder.as_str()).collect::<Vec<_>>().join(", ") }
                </p>
            }
        </div>
    }
}

fn build_footer(
    component: &TemplateEditorComponent,
    link: &Scope<TemplateEditorComponent>,
) -> Html {
    let saving_label = match component.save_stage {
        SaveStage::Checking => "Validando...",
        SaveStage::Persisting => "Guardando...",
        SaveStage::Idle | SaveStage::Confirming(_) => "Guardar",
    };

    html! {
        <div class="template-editor-footer">
            <button class="btn secondary" onclick={link.callback(|_| Msg::Close)}>
                { "Cancelar" }
            </button>
            <button
                class="btn primary"
                disabled={component.is_busy()}
                onclick={link.callback(|_| Msg::Save)}
            >
                { saving_label }
            </button>
        </div>
    }
}
