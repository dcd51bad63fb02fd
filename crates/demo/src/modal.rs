use freshharvest::storefront::PurchaseConfirmation;
use leptos::prelude::*;

fn close(confirmation: RwSignal<Option<PurchaseConfirmation>>) {
    confirmation.set(None);
}

/// Purchase confirmation dialog.
///
/// Closes from its button or a click on the backdrop outside the dialog.
#[component]
pub fn ConfirmationModal(
    /// Latest purchase; the modal is open while this is `Some`.
    confirmation: RwSignal<Option<PurchaseConfirmation>>,
) -> impl IntoView {
    move || {
        confirmation.get().map(|purchase| {
            view! {
                <div class="modal-backdrop" on:click=move |_| close(confirmation)>
                    <div
                        class="modal"
                        role="dialog"
                        aria-modal="true"
                        aria-labelledby="modal-title"
                        on:click=|event: leptos::ev::MouseEvent| event.stop_propagation()
                    >
                        <h2 id="modal-title" class="modal-title">"Purchase confirmed"</h2>
                        <p class="modal-message">{purchase.message()}</p>
                        <button
                            type="button"
                            class="modal-close"
                            on:click=move |_| close(confirmation)
                        >
                            "Close"
                        </button>
                    </div>
                </div>
            }
        })
    }
}
