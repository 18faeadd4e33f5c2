//! Server-rendered pages.
//!
//! The flow is landing → select → input → payment (hosted checkout) →
//! callback → loading → verdict. The decision travels in query strings and,
//! across the checkout redirect, in `sessionStorage`. Nothing is stored
//! server-side.

mod layout;

pub use layout::{escape_html, layout, script_string};

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use verdict_core::templates::CLOSING_LINE;
use verdict_core::{DecisionType, VerdictRequest, MAX_INPUT_CHARS};

use crate::state::AppState;

/// Messages shown on the loading page, one per tick.
pub const LOADING_MESSAGES: [&str; 3] = [
    "Reading your situation…",
    "Removing bias…",
    "Delivering verdict…",
];

/// Milliseconds each loading message stays on screen.
pub const LOADING_TICK_MS: u64 = 1200;

/// Query carried between pages.
#[derive(Debug, Default, Deserialize)]
pub struct DecisionQuery {
    #[serde(rename = "type", default)]
    pub decision_type: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

impl DecisionQuery {
    fn decision_type(&self) -> DecisionType {
        DecisionType::parse_lenient(self.decision_type.as_deref().unwrap_or(""))
    }

    fn input(&self) -> &str {
        self.input.as_deref().unwrap_or("")
    }
}

pub async fn landing(State(state): State<AppState>) -> Html<String> {
    let body = format!(
        r#"<main>
<h1>Stuck on a decision?</h1>
<p>Pay {price}. Get a verdict. Move on.</p>
<a class="button primary" href="/select">Get a Verdict</a>
<p class="muted"><a href="/about" style="color:inherit">System</a></p>
</main>"#,
        price = escape_html(&state.price_label())
    );
    layout("Get a Verdict", &body)
}

pub async fn select() -> Html<String> {
    let buttons: String = DecisionType::ALL
        .iter()
        .map(|t| {
            format!(
                r#"<a class="button" href="/input?type={}">{}</a>"#,
                t.as_str(),
                escape_html(t.label())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    layout("Choose", &format!("<main>\n{}\n</main>", buttons))
}

pub async fn input(State(state): State<AppState>, Query(query): Query<DecisionQuery>) -> Html<String> {
    let decision_type = query.decision_type();
    let body = format!(
        r#"<main>
<p>You're about to receive a verdict. Don't use this lightly.</p>
<form method="get" action="/payment" id="decision">
<input type="hidden" name="type" value="{type_}">
<textarea name="input" id="input" maxlength="{max}" required
  placeholder="Describe your situation in one or two honest lines."></textarea>
<p class="muted" id="count">0/{max}</p>
<label><input type="checkbox" id="accept" required> <span>I accept the outcome.</span></label>
<button class="button primary" type="submit" id="unlock" disabled>Unlock Verdict – {price}</button>
</form>
</main>
<script>
const input = document.getElementById('input');
const accept = document.getElementById('accept');
const unlock = document.getElementById('unlock');
const count = document.getElementById('count');
function refresh() {{
  count.textContent = input.value.length + '/{max}';
  unlock.disabled = !(accept.checked && input.value.trim().length > 0);
}}
input.addEventListener('input', refresh);
accept.addEventListener('change', refresh);
</script>"#,
        type_ = decision_type.as_str(),
        max = MAX_INPUT_CHARS,
        price = escape_html(&state.price_label()),
    );
    layout(decision_type.label(), &body)
}

pub async fn payment(State(state): State<AppState>, Query(query): Query<DecisionQuery>) -> Response {
    if query.input().trim().is_empty() {
        return Redirect::to("/select").into_response();
    }

    let body = format!(
        r#"<main>
<p>Redirecting to payment...</p>
</main>
<script>
sessionStorage.setItem('decisionType', {type_});
sessionStorage.setItem('decisionInput', {input});
window.location.href = {checkout};
</script>"#,
        type_ = script_string(query.decision_type().as_str()),
        input = script_string(query.input()),
        checkout = script_string(&state.settings.checkout_url),
    );
    layout("Payment", &body).into_response()
}

pub async fn callback() -> Html<String> {
    let body = r#"<main>
<p>Processing payment...</p>
</main>
<script>
const params = new URLSearchParams(window.location.search);
const paymentId = params.get('payment_id') || params.get('razorpay_payment_id');
const status = params.get('status');
const type = sessionStorage.getItem('decisionType') || 'yes-no';
const input = sessionStorage.getItem('decisionInput') || '';
sessionStorage.removeItem('decisionType');
sessionStorage.removeItem('decisionInput');
if (paymentId || status === 'success') {
  window.location.replace('/loading?type=' + encodeURIComponent(type) +
    '&input=' + encodeURIComponent(input) +
    '&payment_id=' + encodeURIComponent(paymentId || 'completed'));
} else {
  window.location.replace('/select');
}
</script>"#;
    layout("Processing", body)
}

pub async fn loading(Query(query): Query<DecisionQuery>) -> Html<String> {
    let messages = LOADING_MESSAGES
        .iter()
        .map(|m| script_string(m))
        .collect::<Vec<_>>()
        .join(", ");

    let body = format!(
        r#"<main>
<p class="pulse" id="message">{first}</p>
</main>
<script>
const messages = [{messages}];
const target = '/verdict?type=' + encodeURIComponent({type_}) + '&input=' + encodeURIComponent({input});
let current = 0;
function tick() {{
  if (current < messages.length - 1) {{
    current += 1;
    document.getElementById('message').textContent = messages[current];
    setTimeout(tick, {tick});
  }} else {{
    window.location.replace(target);
  }}
}}
setTimeout(tick, {tick});
</script>"#,
        first = escape_html(LOADING_MESSAGES[0]),
        messages = messages,
        type_ = script_string(query.decision_type().as_str()),
        input = script_string(query.input()),
        tick = LOADING_TICK_MS,
    );
    layout("Delivering verdict", &body)
}

/// Generate and render the verdict. Blank input goes back to the
/// selection page; long input is cut to the limit.
pub async fn verdict(State(state): State<AppState>, Query(query): Query<DecisionQuery>) -> Response {
    let decision_type = query.decision_type();
    let request = match VerdictRequest::clamped(decision_type, query.input()) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Verdict page without usable input");
            return Redirect::to("/select").into_response();
        }
    };

    let generated = state.generator.generate(&request).await;
    tracing::info!(
        decision_type = %decision_type,
        source = ?generated.source,
        "Verdict page rendered"
    );

    let body = format!(
        r#"<main>
<div class="card">
<h2 class="verdict">{verdict}</h2>
<p style="text-align:left">{justification}</p>
<p class="muted">{closing}</p>
</div>
<div class="no-print">
<a class="button primary" href="/select">Another Decision – {price}</a>
<button class="button" type="button" onclick="window.print()">Save Verdict</button>
</div>
</main>"#,
        verdict = escape_html(&generated.verdict.verdict),
        justification = escape_html(&generated.verdict.justification),
        closing = escape_html(CLOSING_LINE),
        price = escape_html(&state.price_label()),
    );
    layout("Verdict", &body).into_response()
}

pub async fn about() -> Html<String> {
    let body = r#"<main class="wide">
<h1>About Us</h1>
<p>When indecision becomes paralysis, we provide clarity.</p>
<section>
<h2>What We Do</h2>
<p>We help you make small, personal decisions when you're stuck. Whether it's a yes or no,
choosing between options, or deciding when to act, we provide a clear, confident verdict for ₹5.</p>
</section>
<section>
<h2>How It Works</h2>
<p>You describe your situation. You pay ₹5. We give you a verdict. The decision is made. You move forward.</p>
<p class="muted">No accounts. No data stored. Just a simple, honest answer when you need it.</p>
</section>
<section>
<h2>Why We Exist</h2>
<p>Sometimes the hardest part of a decision is making it. We remove the paralysis of choice by
giving you a clear answer. The small payment ensures you value the outcome and commit to it.</p>
</section>
<section>
<h2>Payment &amp; Privacy</h2>
<p>We use Razorpay for secure, UPI-friendly payments. We don't store your personal information
or decision history. Each verdict is independent and private.</p>
</section>
<a class="button primary" href="/">Get a Verdict</a>
</main>"#;
    layout("About", body)
}
