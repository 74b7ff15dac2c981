//! Template catalogue: lists the templates of the selected type and opens
//! the editor in a top sheet to create or edit one.
//!
//! The list reloads whenever a `RefreshSignal::Templates` goes through the
//! bus, which is how it learns about saves made in the editor.

use common::editor::{DebounceGate, DebounceTicket};
use common::model::template::{Template, TemplateType};
use log::warn;
use web_sys::HtmlSelectElement;
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::templates::editor::TemplateEditorComponent;
use crate::services::api::TemplateApi;
use crate::services::store::{BusSubscription, RefreshSignal, SignalBus};
use crate::toast::{show_error, show_toast};
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

/// Which template the editor sheet is working on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EditorTarget {
    template_id: Option<i64>,
    /// Remounts the editor on every opening so it starts from the server copy.
    key: u64,
}

pub enum Msg {
    Load,
    Loaded {
        ticket: DebounceTicket,
        templates: Vec<Template>,
    },
    LoadFailed {
        ticket: DebounceTicket,
        error: String,
    },
    SetFilter(Option<TemplateType>),
    New,
    Edit(i64),
    CloseEditor,
    Saved(Template),
    Delete(i64),
    SetDefault(i64),
    ActionDone(&'static str),
    ActionFailed(String),
}

pub struct TemplateListComponent {
    api: TemplateApi,
    templates: Vec<Template>,
    filter: Option<TemplateType>,
    loading: bool,
    load_gate: DebounceGate,
    editor: Option<EditorTarget>,
    openings: u64,
    _refresh: Option<BusSubscription>,
}

impl Component for TemplateListComponent {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let refresh = ctx
            .link()
            .context::<SignalBus>(Callback::noop())
            .map(|(bus, _handle)| {
                let link = ctx.link().clone();
                bus.subscribe(move |signal| {
                    if *signal == RefreshSignal::Templates {
                        link.send_message(Msg::Load);
                    }
                })
            });
        ctx.link().send_message(Msg::Load);

        Self {
            api: TemplateApi::default(),
            templates: Vec::new(),
            filter: None,
            loading: false,
            load_gate: DebounceGate::new(),
            editor: None,
            openings: 0,
            _refresh: refresh,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Load => {
                let ticket = self.load_gate.schedule();
                self.loading = true;
                let api = self.api.clone();
                let filter = self.filter;
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api.list(filter).await {
                        Ok(templates) => link.send_message(Msg::Loaded { ticket, templates }),
                        Err(e) => link.send_message(Msg::LoadFailed {
                            ticket,
                            error: e.to_string(),
                        }),
                    }
                });
                true
            }
            Msg::Loaded { ticket, templates } => {
                if !self.load_gate.is_current(ticket) {
                    return false;
                }
                self.loading = false;
                self.templates = templates;
                true
            }
            Msg::LoadFailed { ticket, error } => {
                if !self.load_gate.is_current(ticket) {
                    return false;
                }
                self.loading = false;
                warn!("template list failed: {error}");
                show_error(&format!("Error cargando las plantillas: {error}"));
                true
            }
            Msg::SetFilter(filter) => {
                if self.filter == filter {
                    return false;
                }
                self.filter = filter;
                ctx.link().send_message(Msg::Load);
                false
            }
            Msg::New => self.open_editor(None),
            Msg::Edit(id) => self.open_editor(Some(id)),
            Msg::CloseEditor | Msg::Saved(_) => {
                self.editor = None;
                true
            }
            Msg::Delete(id) => {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("¿Eliminar esta plantilla?").ok())
                    .unwrap_or(false);
                if confirmed {
                    let api = self.api.clone();
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        match api.delete(id).await {
                            Ok(()) => link.send_message(Msg::ActionDone("Plantilla eliminada.")),
                            Err(e) => link.send_message(Msg::ActionFailed(e.to_string())),
                        }
                    });
                }
                false
            }
            Msg::SetDefault(id) => {
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api.set_default(id).await {
                        Ok(()) => link.send_message(Msg::ActionDone(
                            "Plantilla marcada como predeterminada.",
                        )),
                        Err(e) => link.send_message(Msg::ActionFailed(e.to_string())),
                    }
                });
                false
            }
            Msg::ActionDone(message) => {
                show_toast(message);
                ctx.link().send_message(Msg::Load);
                false
            }
            Msg::ActionFailed(error) => {
                show_error(&format!("No se pudo completar la operación: {error}"));
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let editor_title = match self.editor {
            Some(EditorTarget {
                template_id: Some(_),
                ..
            }) => "Editar plantilla",
            _ => "Nueva plantilla",
        };

        html! {
            <section class="template-list">
                <div class="template-list-toolbar">
                    { self.filter_select(link) }
                    <button class="btn primary" onclick={link.callback(|_| Msg::New)}>
                        <i class="material-icons">{"add"}</i>
                        { "Nueva plantilla" }
                    </button>
                </div>
                if self.loading && self.templates.is_empty() {
                    <p class="muted">{ "Cargando plantillas..." }</p>
                } else if self.templates.is_empty() {
                    <p class="muted">{ "No hay plantillas." }</p>
                } else {
                    <table>
                        <thead>
                            <tr>
                                <th>{ "Nombre" }</th>
                                <th>{ "Código" }</th>
                                <th>{ "Tipo" }</th>
                                <th>{ "Versión" }</th>
                                <th>{ "Estado" }</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            { for self.templates.iter().map(|t| template_row(t, link)) }
                        </tbody>
                    </table>
                }
                <YwMaterialTopSheet
                    open={self.editor.is_some()}
                    title={editor_title}
                    on_dismiss={link.callback(|_| Msg::CloseEditor)}
                    wide=true
                >
                    if let Some(target) = self.editor {
                        <TemplateEditorComponent
                            key={target.key.to_string()}
                            template_id={target.template_id}
                            default_type={self.filter.unwrap_or_default()}
                            on_close={link.callback(|_| Msg::CloseEditor)}
                            on_saved={link.callback(Msg::Saved)}
                        />
                    }
                </YwMaterialTopSheet>
            </section>
        }
    }
}

impl TemplateListComponent {
    fn open_editor(&mut self, template_id: Option<i64>) -> bool {
        self.openings += 1;
        self.editor = Some(EditorTarget {
            template_id,
            key: self.openings,
        });
        true
    }

    fn filter_select(&self, link: &Scope<Self>) -> Html {
        html! {
            <select
                onchange={link.callback(|e: Event| {
                    let value = e.target_unchecked_into::<HtmlSelectElement>().value();
                    Msg::SetFilter(value.parse().ok())
                })}
            >
                <option value="" selected={self.filter.is_none()}>{ "Todos los tipos" }</option>
                { for TemplateType::ALL.iter().map(|t| html! {
                    <option value={t.as_str()} selected={self.filter == Some(*t)}>{ t.label() }</option>
                }) }
            </select>
        }
    }
}

fn template_row(template: &Template, link: &Scope<TemplateListComponent>) -> Html {
    let id = template.id;
    html! {
        <tr class={classes!((!template.is_active).then_some("inactive"))}>
            <td>
                { template.name.clone() }
                if template.is_default {
                    <span class="badge" title="Predeterminada">{ "★" }</span>
                }
            </td>
            <td><code>{ template.code.clone() }</code></td>
            <td>{ template.template_type.label() }</td>
            <td>{ template.version }</td>
            <td>{ if template.is_active { "Activa" } else { "Inactiva" } }</td>
            <td class="actions">
                <button class="icon-btn" title="Editar" onclick={link.callback(move |_| Msg::Edit(id))}>
                    <i class="material-icons">{"edit"}</i>
                </button>
                if !template.is_default {
                    <button
                        class="icon-btn"
                        title="Marcar como predeterminada"
                        onclick={link.callback(move |_| Msg::SetDefault(id))}
                    >
                        <i class="material-icons">{"star_outline"}</i>
                    </button>
                }
                <button class="icon-btn" title="Eliminar" onclick={link.callback(move |_| Msg::Delete(id))}>
                    <i class="material-icons">{"delete"}</i>
                </button>
            </td>
        </tr>
    }
}
