//! Embedded HTML/CSS/JS frontend for the vistrack web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>vistrack Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --range: rgba(88,166,255,0.18);
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

[data-theme="light"] {
  --bg: #f6f8fa;
  --surface: #ffffff;
  --border: #d0d7de;
  --text: #1f2328;
  --text-muted: #656d76;
  --accent: #0969da;
  --range: rgba(9,105,218,0.12);
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }

.badge {
  display: inline-flex;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  background: var(--surface);
  border: 1px solid var(--border);
}
.badge.ok { border-color: var(--green); color: var(--green); }
.badge.warn { border-color: var(--yellow); color: var(--yellow); }

/* Filter tabs */
nav {
  display: flex;
  gap: 4px;
  margin-bottom: 16px;
  background: var(--surface);
  border-radius: var(--radius);
  padding: 4px;
  border: 1px solid var(--border);
}
nav button {
  flex: 1;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
}
nav button:hover { color: var(--text); }
nav button.active { background: var(--accent); color: #fff; }

.range-bar {
  display: flex;
  align-items: center;
  gap: 12px;
  margin-bottom: 24px;
  color: var(--text-muted);
}

.btn {
  padding: 6px 14px;
  border-radius: 6px;
  border: 1px solid var(--border);
  background: var(--surface);
  color: var(--text);
  cursor: pointer;
  font-size: 13px;
}
.btn.primary { background: var(--accent); border-color: var(--accent); color: #fff; }
.btn:disabled { opacity: 0.4; cursor: not-allowed; }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 16px; }

.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
  gap: 16px;
  margin-bottom: 16px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  text-align: center;
}
.stat-card .value { font-size: 28px; font-weight: 700; font-family: var(--mono); color: var(--accent); }
.stat-card .label { font-size: 12px; color: var(--text-muted); text-transform: uppercase; }

.bars .row { display: flex; align-items: center; gap: 8px; margin-bottom: 6px; font-size: 12px; }
.bars .row .name { width: 110px; font-family: var(--mono); color: var(--text-muted); }
.bars .row .track { flex: 1; display: flex; height: 14px; }
.bars .row .in { background: var(--accent); }
.bars .row .out { background: var(--green); }

.dept { display: flex; align-items: center; gap: 8px; margin-bottom: 6px; }
.dept .swatch { width: 12px; height: 12px; border-radius: 3px; }
.dept .pct { margin-left: auto; font-family: var(--mono); color: var(--text-muted); }

table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid var(--border); }
th { color: var(--text-muted); font-weight: 500; }
input[type="search"] {
  width: 100%;
  padding: 6px 10px;
  margin-bottom: 12px;
  border-radius: 6px;
  border: 1px solid var(--border);
  background: var(--bg);
  color: var(--text);
}
.muted { color: var(--text-muted); }
.warn { color: var(--yellow); margin-bottom: 12px; }

/* Picker modal */
.overlay {
  display: none;
  position: fixed;
  inset: 0;
  background: rgba(0,0,0,0.5);
  align-items: center;
  justify-content: center;
}
.overlay.open { display: flex; }
.modal {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  width: 340px;
}
.modal .head { display: flex; align-items: center; justify-content: space-between; margin-bottom: 12px; }
.modal .head h3 { font-size: 15px; }
.cal { display: grid; grid-template-columns: repeat(7, 1fr); gap: 2px; text-align: center; }
.cal .wd { font-size: 11px; color: var(--text-muted); padding: 4px 0; }
.cal .day {
  position: relative;
  padding: 6px 0;
  border-radius: 6px;
  cursor: pointer;
  font-family: var(--mono);
}
.cal .day:hover { background: var(--range); }
.cal .day.selected { background: var(--accent); color: #fff; font-weight: 700; }
.cal .day.in-range { background: var(--range); }
.cal .day.today { outline: 1px solid var(--accent); }
.cal .day .mark-start, .cal .day .mark-end {
  position: absolute;
  top: 2px;
  width: 6px;
  height: 6px;
  border-radius: 50%;
}
.cal .day .mark-start { left: 2px; background: var(--green); }
.cal .day .mark-end { right: 2px; background: var(--red); }
.status { margin: 12px 0; font-size: 13px; }
.status div:first-child { font-weight: 600; }
.modal .actions { display: flex; gap: 8px; justify-content: flex-end; }
</style>
</head>
<body>
<div class="app" id="app">

  <header>
    <h1><span class="logo">vistrack</span> Visitor Dashboard</h1>
    <div id="health"></div>
  </header>

  <nav id="tabs"></nav>

  <div class="range-bar">
    <span id="range-label">No range committed</span>
    <button class="btn" id="btn-open">Select dates</button>
  </div>

  <input type="search" id="search" placeholder="Search visitors: host, name, ID, arrival time">

  <div id="report"></div>

</div>

<div class="overlay" id="overlay">
  <div class="modal" id="modal">
    <div class="head">
      <button class="btn" id="btn-prev">‹</button>
      <h3 id="cal-title"></h3>
      <button class="btn" id="btn-next">›</button>
    </div>
    <div class="cal" id="cal"></div>
    <div class="status" id="status"></div>
    <div class="actions">
      <button class="btn" id="btn-today">Today</button>
      <button class="btn" id="btn-cancel">Cancel</button>
      <button class="btn primary" id="btn-apply" disabled>Apply</button>
    </div>
  </div>
</div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
const TABS = ['Day', 'Week', 'Month', 'Quarterly', 'Yearly', 'Custom Range'];
let session = null;
let search = '';
let searchTimer = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return res.json();
}

function fmt(n) {
  if (n === undefined || n === null) return '-';
  return n.toLocaleString();
}

function esc(s) {
  return String(s ?? '').replace(/[&<>"]/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' }[c]));
}

// ---------------------------------------------------------------------------
// Session and tabs
// ---------------------------------------------------------------------------
function renderTabs() {
  const nav = document.getElementById('tabs');
  nav.innerHTML = TABS.map(t =>
    `<button data-tab="${t}" class="${session && session.label === t ? 'active' : ''}">${t}</button>`
  ).join('');
  const r = session ? session.range : {};
  document.getElementById('range-label').textContent =
    r.start && r.end ? `${r.start} → ${r.end}` : 'No range committed';
}

document.getElementById('tabs').addEventListener('click', async e => {
  const tab = e.target.dataset.tab;
  if (!tab) return;
  if (tab === 'Custom Range' && !(session.range.start && session.range.end)) {
    return openPicker();
  }
  session = await api('PUT', '/api/session/filter', { filter: tab });
  renderTabs();
  loadReport();
});

// ---------------------------------------------------------------------------
// Picker
// ---------------------------------------------------------------------------
function renderPicker(p) {
  document.getElementById('overlay').classList.toggle('open', p.is_open);
  document.body.dataset.theme = p.theme;
  document.getElementById('cal-title').textContent = p.title;
  document.getElementById('btn-apply').disabled = !p.can_apply;

  const cells = p.weekdays.map(w => `<div class="wd">${w}</div>`);
  for (const c of p.grid) {
    if (c.kind === 'blank') { cells.push('<div></div>'); continue; }
    const marks = (c.is_start ? '<span class="mark-start"></span>' : '') +
                  (c.is_end ? '<span class="mark-end"></span>' : '');
    cells.push(`<div class="day ${c.style}" data-date="${c.date}">${marks}${c.day}</div>`);
  }
  document.getElementById('cal').innerHTML = cells.join('');
  document.getElementById('status').innerHTML = p.status.map(l => `<div>${esc(l)}</div>`).join('');
}

async function openPicker() {
  renderPicker(await api('POST', '/api/picker/open'));
}

document.getElementById('btn-open').addEventListener('click', openPicker);
document.getElementById('btn-prev').addEventListener('click', async () =>
  renderPicker(await api('POST', '/api/picker/navigate', { delta: -1 })));
document.getElementById('btn-next').addEventListener('click', async () =>
  renderPicker(await api('POST', '/api/picker/navigate', { delta: 1 })));
document.getElementById('btn-today').addEventListener('click', async () =>
  renderPicker(await api('POST', '/api/picker/today')));
document.getElementById('btn-cancel').addEventListener('click', async () =>
  renderPicker(await api('POST', '/api/picker/cancel')));

document.getElementById('cal').addEventListener('click', async e => {
  const el = e.target.closest('.day');
  if (!el) return;
  renderPicker(await api('POST', '/api/picker/select', { date: el.dataset.date }));
});

document.getElementById('btn-apply').addEventListener('click', async () => {
  const res = await api('POST', '/api/picker/apply');
  renderPicker(res.picker);
  if (res.applied) {
    session = res.session;
    renderTabs();
    loadReport();
  }
});

async function dismiss() {
  renderPicker(await api('POST', '/api/picker/dismiss'));
}

document.getElementById('overlay').addEventListener('click', e => {
  if (e.target.id === 'overlay') dismiss();
});
document.addEventListener('keydown', e => {
  if (e.key === 'Escape' && document.getElementById('overlay').classList.contains('open')) dismiss();
});

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------
async function loadReport() {
  const el = document.getElementById('report');
  const r = await api('GET', '/api/report?search=' + encodeURIComponent(search));
  if (r.error) {
    el.innerHTML = `<div class="card muted">${esc(r.error)}</div>`;
    return;
  }

  const peak = Math.max(1, ...r.intervals.map(b => b.total));
  const bars = r.intervals.length
    ? r.intervals.map(b => `
        <div class="row">
          <span class="name">${esc(b.label)}</span>
          <span class="track">
            <span class="in" style="width:${100 * b.checkins / peak}%"></span>
            <span class="out" style="width:${100 * b.checkouts / peak}%"></span>
          </span>
          <span>${b.total}</span>
        </div>`).join('')
    : '<div class="muted">No interval data.</div>';

  const totalVisits = r.departments.reduce((n, d) => n + d.value, 0);
  const depts = totalVisits
    ? r.departments.map(d => `
        <div class="dept">
          <span class="swatch" style="background:${d.color}"></span>
          <span>${esc(d.label)}</span>
          <span class="pct">${fmt(d.value)} · ${d.percentage.toFixed(1)}%</span>
        </div>`).join('')
    : '<div class="muted">No visits recorded.</div>';

  const pending = r.pending_checkouts.map(v =>
    `<tr><td>${esc(v.host_name)}</td><td>${esc(v.visitor_name)}</td><td>${esc(v.visitor_id)}</td><td>${esc(v.checkin_time)}</td></tr>`
  ).join('') || '<tr><td colspan="4" class="muted">Nobody.</td></tr>';

  const expected = r.expected_visitors.map(v =>
    `<tr><td>${esc(v.host_name)}</td><td>${esc(v.visitor_name)}</td><td>${esc(v.expected_time_of_arrival)}</td><td>${esc(v.purpose ?? '-')}</td></tr>`
  ).join('') || '<tr><td colspan="4" class="muted">Nobody.</td></tr>';

  el.innerHTML = `
    ${r.stale ? `<div class="warn">Snapshot was captured for '${esc(r.filter_type)}'; the active filter differs.</div>` : ''}
    <div class="stats-grid">
      <div class="stat-card"><div class="value">${fmt(r.stats.total_employees)}</div><div class="label">Employees</div></div>
      <div class="stat-card"><div class="value">${fmt(r.stats.total_pre_registers)}</div><div class="label">Pre-registered</div></div>
      <div class="stat-card"><div class="value">${fmt(r.stats.total_checkin_visitors)}</div><div class="label">Checked in</div></div>
      <div class="stat-card"><div class="value">${fmt(r.stats.total_checkout_visitors)}</div><div class="label">Checked out</div></div>
      <div class="stat-card"><div class="value">${r.pre_register_to_checkin_ratio.toFixed(2)}%</div><div class="label">Pre-reg → check-in</div></div>
      <div class="stat-card"><div class="value">${r.checkin_to_checkout_pct}%</div><div class="label">Check-in → out</div></div>
    </div>
    <div class="card"><h2>Check-ins by Interval</h2><div class="bars">${bars}</div></div>
    <div class="card"><h2>Visits by Department</h2>${depts}</div>
    <div class="card">
      <h2>Not Checked Out</h2>
      <table><thead><tr><th>Host</th><th>Visitor</th><th>Visitor ID</th><th>Check-in</th></tr></thead><tbody>${pending}</tbody></table>
      <h2 style="margin-top:16px">Expected Today</h2>
      <table><thead><tr><th>Host</th><th>Visitor</th><th>ETA</th><th>Purpose</th></tr></thead><tbody>${expected}</tbody></table>
    </div>`;
}

document.getElementById('search').addEventListener('input', e => {
  clearTimeout(searchTimer);
  searchTimer = setTimeout(() => { search = e.target.value; loadReport(); }, 250);
});

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------
async function loadHealth() {
  const h = await api('GET', '/api/health');
  const badge = (ok, text) => `<span class="badge ${ok ? 'ok' : 'warn'}">${text}</span>`;
  document.getElementById('health').innerHTML =
    badge(h.snapshot_readable, 'snapshot') + ' ' + badge(h.session_exists, 'session');
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
(async function init() {
  session = await api('GET', '/api/session');
  renderTabs();
  renderPicker(await api('GET', '/api/picker'));
  loadReport();
  loadHealth();
})();
</script>
</body>
</html>
"##;
