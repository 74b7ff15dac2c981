//! Sliding sheet used for every modal surface: the template editor and the
//! dialogs stacked on top of it.
//!
//! The sheet is controlled by its parent through `open`; the CSS `show` class
//! animates it in and out. Content stays mounted only while open, so closing
//! a sheet also discards whatever state its children held.

use uuid::Uuid;
use yew::{classes, html, AttrValue, Callback, Component, Context, Html, MouseEvent, Properties};

pub struct YwMaterialTopSheet {
    id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub open: bool,
    #[prop_or_default]
    pub title: AttrValue,
    #[prop_or_default]
    pub children: Html,
    /// Shows a close button when set.
    #[prop_or_default]
    pub on_dismiss: Option<Callback<()>>,
    #[prop_or_default]
    pub wide: bool,
}

impl Component for YwMaterialTopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let dismiss = props.on_dismiss.as_ref().map(|on_dismiss| {
            let on_dismiss = on_dismiss.clone();
            html! {
                <button
                    class="top-sheet-close"
                    title="Cerrar"
                    onclick={Callback::from(move |_: MouseEvent| on_dismiss.emit(()))}
                >
                    <i class="material-icons">{"close"}</i>
                </button>
            }
        });

        html! {
            <div
                class={classes!("top-sheet", props.open.then_some("show"), props.wide.then_some("wide"))}
                id={self.id.clone()}
                aria-hidden={(!props.open).to_string()}
            >
                {
                    if props.open {
                        html! {
                            <>
                                <div class="top-sheet-header">
                                    <h2>{ props.title.clone() }</h2>
                                    { dismiss.unwrap_or_default() }
                                </div>
                                <div class="top-sheet-body">{ props.children.clone() }</div>
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }
}
