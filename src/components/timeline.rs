//! Horizontal timeline of the active result.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use super::context::ExplorerContext;
use crate::model::{ReportId, TimelineEntry};
use crate::sync::Origin;

/// Dated strip of the active result; clicking an entry selects it.
#[component]
pub fn Timeline() -> impl IntoView {
	let explorer = expect_context::<ExplorerContext>();

	let entries = Memo::new(move |_| {
		explorer.generation.track();
		explorer.with(|e| e.timeline())
	});
	let bounds = move || {
		entries.with(|list| {
			let first = list.first()?.date.format("%Y-%m-%d").to_string();
			let last = list.last()?.date.format("%Y-%m-%d").to_string();
			Some((first, last))
		})
	};

	// Scroll the track only; a page scroll would interrupt the list's.
	let track_ref = NodeRef::<leptos::html::Div>::new();
	Effect::new(move |_| {
		let Some(id) = explorer.focus.get() else {
			return;
		};
		request_animation_frame(move || center_entry(track_ref, id));
	});

	view! {
		<section class="timeline">
			<div class="timeline-track" node_ref=track_ref style="position: relative; overflow-x: auto;">
				<For
					each=move || entries.get()
					key=|entry| entry.id
					children=move |entry: TimelineEntry| {
						let id = entry.id;
						view! {
							<button
								class="timeline-entry"
								class:focused=move || explorer.focus.get() == Some(id)
								class:selected=move || explorer.selected.get() == Some(id)
								id=entry_dom_id(id)
								title=entry.tooltip()
								style=format!(
									"left: {:.3}%; background-color: {};",
									entry.offset * 100.0,
									entry.color,
								)
								on:click=move |_| explorer.select(id, Origin::Timeline)
							/>
						}
					}
				/>
			</div>
			{move || {
				bounds()
					.map(|(first, last)| {
						view! {
							<div class="timeline-axis">
								<span>{first}</span>
								<span>{last}</span>
							</div>
						}
					})
			}}
		</section>
	}
}

fn entry_dom_id(id: ReportId) -> String {
	format!("timeline-{id}")
}

fn center_entry(track_ref: NodeRef<leptos::html::Div>, id: ReportId) {
	let Some(track) = track_ref.get_untracked() else {
		return;
	};
	let entry = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(&entry_dom_id(id)))
		.and_then(|e| e.dyn_into::<HtmlElement>().ok());
	if let Some(entry) = entry {
		let track: HtmlElement = track.into();
		track.set_scroll_left(entry.offset_left() - track.client_width() / 2);
	}
}
