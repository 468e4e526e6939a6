// =============================================================================
// Dashboard page served at `/`
// =============================================================================
//
// Static HTML; all data comes from `/api/v1/defaults` and `/api/v1/scan`.
// The scan button stays disabled while a request is in flight.
// =============================================================================

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>FRIDAY UNIFIED AI</title>
    <script src="https://unpkg.com/lightweight-charts@4.1.0/dist/lightweight-charts.standalone.production.js"></script>
    <style>
        * { box-sizing: border-box; }
        body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; background: #0d1117; color: #fff; display: flex; min-height: 100vh; }
        aside { width: 280px; padding: 24px; background: #161b22; border-right: 1px solid #30363d; }
        aside h2 { font-size: 18px; margin-top: 0; }
        aside label { display: block; font-size: 13px; color: #8b949e; margin: 16px 0 6px; }
        aside input, aside select { width: 100%; padding: 8px; background: #0d1117; color: #fff; border: 1px solid #30363d; border-radius: 6px; }
        main { flex: 1; padding: 24px 32px; }
        h1 { margin: 0 0 4px; }
        .subtitle { color: #8b949e; margin-bottom: 24px; }
        button { width: 100%; padding: 12px; border: none; border-radius: 20px; background: linear-gradient(45deg, #00c6ff, #0072ff); color: #fff; font-weight: bold; cursor: pointer; }
        button:disabled { opacity: 0.5; cursor: wait; }
        .metrics { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
        .metric { background: #161b22; padding: 15px; border-radius: 10px; border: 1px solid #30363d; }
        .metric .label { font-size: 13px; color: #8b949e; }
        .metric .value { font-size: 28px; margin-top: 6px; }
        .flags { margin: 16px 0; color: #8b949e; font-size: 14px; }
        .flags .hammer { color: #3fb950; font-weight: bold; }
        hr { border: none; border-top: 1px solid #30363d; margin: 24px 0; }
        #chart { height: 450px; }
        .error { background: #3d1418; border: 1px solid #f85149; color: #f85149; padding: 12px 16px; border-radius: 6px; }
        .hidden { display: none; }
    </style>
</head>
<body>
    <aside>
        <h2>Brain Settings</h2>
        <label for="symbol">Enter Symbol</label>
        <input id="symbol" type="text">
        <label for="timeframe">Timeframe</label>
        <select id="timeframe"></select>
        <label for="risk" id="risk-label">Risk Per Trade</label>
        <input id="risk" type="number" min="0" step="1">
    </aside>
    <main>
        <h1>FRIDAY UNIFIED AI</h1>
        <div class="subtitle">Scalping | Swing | Fibonacci | Risk Management</div>
        <button id="scan">EXECUTE AI SCAN</button>
        <hr>
        <div id="error" class="error hidden"></div>
        <div id="dashboard" class="hidden">
            <div class="metrics" id="metrics"></div>
            <div class="flags" id="flags"></div>
            <hr>
            <div id="chart"></div>
        </div>
    </main>
    <script>
        const $ = (id) => document.getElementById(id);
        let chart = null;

        async function loadDefaults() {
            const res = await fetch('/api/v1/defaults');
            const d = await res.json();
            $('symbol').value = d.symbol;
            $('risk').value = d.risk_per_trade;
            $('risk-label').textContent = `Risk Per Trade (${d.currency_symbol})`;
            for (const tf of d.timeframes) {
                const opt = document.createElement('option');
                opt.value = tf;
                opt.textContent = tf;
                opt.selected = tf === d.timeframe;
                $('timeframe').appendChild(opt);
            }
        }

        function showError(message) {
            $('dashboard').classList.add('hidden');
            $('error').textContent = message;
            $('error').classList.remove('hidden');
        }

        function renderMetrics(report) {
            $('metrics').innerHTML = '';
            for (const m of report.metrics) {
                const el = document.createElement('div');
                el.className = 'metric';
                el.innerHTML = `<div class="label"></div><div class="value"></div>`;
                el.querySelector('.label').textContent = m.label;
                el.querySelector('.value').textContent = m.value;
                $('metrics').appendChild(el);
            }
            const hammer = report.hammer
                ? '<span class="hammer">Hammer candle detected on the last bar</span>'
                : 'No hammer on the last bar';
            $('flags').innerHTML = `${hammer} &middot; Fib 0.618: ${report.fib_618.toFixed(2)} &middot; ${report.bar_count} bars`;
        }

        function renderChart(descriptor) {
            const container = $('chart');
            if (chart) { chart.remove(); }
            chart = LightweightCharts.createChart(container, {
                height: 450,
                width: container.clientWidth,
                layout: { background: { color: '#0d1117' }, textColor: '#c9d1d9' },
                grid: { vertLines: { color: '#21262d' }, horzLines: { color: '#21262d' } },
                crosshair: { mode: LightweightCharts.CrosshairMode.Normal },
                timeScale: { timeVisible: true, secondsVisible: false },
            });
            chart.addCandlestickSeries().setData(descriptor.candles);
            for (const overlay of descriptor.overlays) {
                const line = chart.addLineSeries({ color: '#f0b429', lineWidth: 2, title: overlay.name });
                line.setData(overlay.points.filter((p) => p.value !== null));
            }
            chart.timeScale().fitContent();
        }

        async function runScan() {
            $('scan').disabled = true;
            $('scan').textContent = 'Analyzing Market...';
            try {
                const res = await fetch('/api/v1/scan', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({
                        symbol: $('symbol').value,
                        timeframe: $('timeframe').value,
                        risk_per_trade: Number($('risk').value),
                    }),
                });
                const report = await res.json();
                if (!res.ok) { showError(report.error); return; }
                if (report.status !== 'ok') { showError(report.notice); return; }
                $('error').classList.add('hidden');
                $('dashboard').classList.remove('hidden');
                renderMetrics(report);
                renderChart(report.chart);
            } catch (e) {
                showError('Data fetch failed. Please check symbol.');
            } finally {
                $('scan').disabled = false;
                $('scan').textContent = 'EXECUTE AI SCAN';
            }
        }

        $('scan').addEventListener('click', runScan);
        window.addEventListener('resize', () => { if (chart) chart.applyOptions({ width: $('chart').clientWidth }); });
        loadDefaults();
    </script>
</body>
</html>
"##;
