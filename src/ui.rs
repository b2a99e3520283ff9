use crate::classify::{StatusColor, ThresholdScheme};
use crate::models::MealContext;

pub fn render_index(scheme: ThresholdScheme, premium: bool) -> String {
    let plan = if premium { "Premium" } else { "Free" };
    INDEX_HTML
        .replace("{{PLAN}}", plan)
        .replace("{{PREMIUM}}", if premium { "true" } else { "false" })
        .replace("{{HINT_FASTING}}", &scheme.target_hint(MealContext::Fasting))
        .replace("{{HINT_AFTER_MEAL}}", &scheme.target_hint(MealContext::AfterMeal))
        .replace("{{COLORS}}", &color_table())
}

/// JS object literal mapping serialized color names to their hex values.
fn color_table() -> String {
    let entries: Vec<String> = StatusColor::ALL
        .iter()
        .map(|color| format!("{}: '{}'", color.as_str(), color.hex()))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Glucose Log</title>
  <style>
    :root {
      --bg: #f8f9fa;
      --ink: #23212b;
      --accent: #6200ee;
      --card: #ffffff;
      --muted: #6f6a75;
      --shadow: 0 12px 32px rgba(98, 0, 238, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 24px 14px 48px;
    }

    .app {
      width: min(720px, 100%);
      display: grid;
      gap: 18px;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      background: var(--accent);
      color: white;
      border-radius: 18px;
      padding: 18px 22px;
    }

    header h1 {
      margin: 0;
      font-size: 1.5rem;
    }

    .plan {
      border-radius: 999px;
      padding: 6px 14px;
      font-weight: 600;
      background: #ffc107;
      color: var(--ink);
    }

    .plan[data-premium="true"] {
      background: #4caf50;
      color: white;
    }

    .card {
      background: var(--card);
      border-radius: 14px;
      box-shadow: var(--shadow);
      padding: 20px;
      display: grid;
      gap: 12px;
    }

    .card h2 {
      margin: 0;
      font-size: 1.1rem;
    }

    .contexts {
      display: flex;
      gap: 24px;
      justify-content: space-around;
    }

    .reference {
      background: #e3f2fd;
      color: #1565c0;
      padding: 8px;
      border-radius: 6px;
      text-align: center;
      font-size: 0.8rem;
    }

    input[type="text"],
    input[type="datetime-local"] {
      border: 1px solid #c9c4d0;
      border-radius: 8px;
      padding: 12px;
      font-size: 1rem;
      width: 100%;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    #chart {
      width: 100%;
      height: 220px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }

    .placeholder {
      text-align: center;
      color: var(--muted);
    }

    ul.logs {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    ul.logs li {
      background: white;
      border-radius: 10px;
      border-left: 6px solid var(--accent);
      padding: 10px 14px;
      box-shadow: var(--shadow);
    }

    ul.logs .value {
      font-weight: 600;
    }

    ul.logs .meta {
      color: var(--muted);
      font-size: 0.85rem;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Glucose Log</h1>
      <span class="plan" id="plan" data-premium="{{PREMIUM}}">{{PLAN}}</span>
    </header>

    <form class="card" id="reading-form" method="post" action="/readings">
      <h2>New reading</h2>
      <div class="contexts">
        <label><input type="radio" name="context" value="fasting" checked /> Fasting</label>
        <label><input type="radio" name="context" value="afterMeal" /> After meal</label>
      </div>
      <div class="reference" id="reference">{{HINT_FASTING}}</div>
      <input type="text" name="value" id="value" inputmode="numeric" placeholder="mg/dL" autocomplete="off" />
      <input type="datetime-local" name="recorded_at" id="recorded-at" />
      <button type="submit">Save reading</button>
      <div class="status" id="status"></div>
    </form>

    <section class="card">
      <h2>Trend</h2>
      <div id="chart-area"></div>
    </section>

    <section class="card">
      <h2>Recent readings</h2>
      <ul class="logs" id="logs"></ul>
    </section>
  </main>

  <script>
    const hints = { fasting: '{{HINT_FASTING}}', afterMeal: '{{HINT_AFTER_MEAL}}' };
    const colors = {{COLORS}};
    const form = document.getElementById('reading-form');
    const valueEl = document.getElementById('value');
    const recordedAtEl = document.getElementById('recorded-at');
    const referenceEl = document.getElementById('reference');
    const statusEl = document.getElementById('status');
    const chartArea = document.getElementById('chart-area');
    const logsEl = document.getElementById('logs');
    const planEl = document.getElementById('plan');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const selectedContext = () => form.querySelector('input[name="context"]:checked').value;

    form.querySelectorAll('input[name="context"]').forEach((radio) => {
      radio.addEventListener('change', () => {
        referenceEl.textContent = hints[selectedContext()];
      });
    });

    const renderChart = (series) => {
      if (!series.enough_data) {
        chartArea.innerHTML = '<p class="placeholder">Not enough data yet.</p>';
        return;
      }
      const width = 600;
      const height = 220;
      const pad = 40;
      const min = Math.min(...series.data) - 10;
      const max = Math.max(...series.data) + 10;
      const xStep = series.data.length > 1 ? (width - pad * 2) / (series.data.length - 1) : 0;
      const x = (i) => pad + i * xStep;
      const y = (v) => height - pad - ((v - min) / (max - min)) * (height - pad * 2);
      const path = series.data.map((v, i) => `${i === 0 ? 'M' : 'L'} ${x(i)} ${y(v)}`).join(' ');
      const dots = series.data.map((v, i) => `<circle class="chart-point" cx="${x(i)}" cy="${y(v)}" r="5" />`).join('');
      const labels = series.labels
        .map((label, i) => `<text class="chart-label" x="${x(i)}" y="${height - 12}" text-anchor="middle">${label}</text>`)
        .join('');
      chartArea.innerHTML = `<svg id="chart" viewBox="0 0 ${width} ${height}" role="img"><path class="chart-line" d="${path}" />${dots}${labels}</svg>`;
    };

    const renderLocked = () => {
      chartArea.innerHTML = '<p class="placeholder">Upgrade to Premium to see the trend chart.</p>';
    };

    const renderLogs = (readings) => {
      logsEl.innerHTML = '';
      readings.forEach((item) => {
        const li = document.createElement('li');
        li.style.borderLeftColor = colors[item.current.color];
        const when = new Date(item.recorded_at).toLocaleString([], { dateStyle: 'short', timeStyle: 'short' });
        const context = item.context === 'fasting' ? 'Fasting' : 'After meal';
        li.innerHTML = `<div class="value">${item.value} mg/dL</div><div class="meta">${item.current.label} | ${context} | ${when}</div>`;
        logsEl.appendChild(li);
      });
    };

    const loadReadings = async () => {
      const res = await fetch('/api/readings');
      if (!res.ok) {
        throw new Error('Unable to load readings');
      }
      renderLogs((await res.json()).readings);
    };

    const loadSeries = async () => {
      const res = await fetch('/api/series');
      if (res.status === 402) {
        renderLocked();
        return;
      }
      if (!res.ok) {
        throw new Error('Unable to load chart');
      }
      renderChart(await res.json());
    };

    const refresh = async () => {
      await Promise.all([loadReadings(), loadSeries()]);
    };

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      setStatus('Saving...', 'info');
      const body = { value: valueEl.value, context: selectedContext() };
      if (recordedAtEl.value) {
        body.recorded_at = recordedAtEl.value;
      }
      try {
        const res = await fetch('/api/readings', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(body)
        });
        if (!res.ok) {
          throw new Error((await res.text()) || 'Request failed');
        }
        valueEl.value = '';
        setStatus('Saved', 'ok');
        setTimeout(() => refresh().catch((err) => setStatus(err.message, 'error')), 150);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    const showPlan = (premium) => {
      planEl.textContent = premium ? 'Premium' : 'Free';
      planEl.dataset.premium = String(premium);
    };

    planEl.addEventListener('click', async () => {
      if (planEl.dataset.premium === 'true') {
        return;
      }
      if (!window.confirm('Upgrade to Premium: confirm once your payment has been sent.')) {
        return;
      }
      try {
        const res = await fetch('/api/premium', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ enabled: true })
        });
        if (!res.ok) {
          throw new Error('Unable to unlock Premium');
        }
        showPlan((await res.json()).premium);
        await loadSeries();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
