/// Embedded viewer page for the hierarchy visualization

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Apalysis - Model Hierarchy</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #1a1a2e;
            color: #eee;
            overflow: hidden;
        }

        #container {
            display: flex;
            height: 100vh;
        }

        #graph {
            flex: 1;
            background: #16213e;
        }

        #sidebar {
            width: 340px;
            background: #1a1a2e;
            border-left: 1px solid #333;
            padding: 20px;
            overflow-y: auto;
        }

        h1 {
            font-size: 1.4em;
            margin-bottom: 10px;
            color: #00d9ff;
        }

        h2 {
            font-size: 1.1em;
            margin: 15px 0 10px;
            color: #888;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .stat {
            display: flex;
            justify-content: space-between;
            padding: 8px 0;
            border-bottom: 1px solid #333;
        }

        .stat-value {
            color: #00d9ff;
            font-weight: bold;
        }

        #node-info {
            display: none;
            margin-top: 20px;
            padding: 15px;
            background: #16213e;
            border-radius: 8px;
        }

        #node-info.visible {
            display: block;
        }

        #node-info h3 {
            color: #00d9ff;
            margin-bottom: 10px;
            word-break: break-all;
        }

        .node-stat {
            display: flex;
            justify-content: space-between;
            gap: 10px;
            padding: 5px 0;
            font-size: 0.9em;
        }

        .node-stat span:last-child {
            text-align: right;
            word-break: break-all;
        }

        .legend {
            display: flex;
            flex-wrap: wrap;
            gap: 10px;
        }

        .legend-item {
            display: flex;
            align-items: center;
            gap: 5px;
            font-size: 0.85em;
        }

        .legend-color {
            width: 12px;
            height: 12px;
            border-radius: 50%;
        }

        .controls {
            display: flex;
            gap: 8px;
        }

        .controls button {
            flex: 1;
            background: #333;
            color: #eee;
            border: 1px solid #555;
            border-radius: 4px;
            padding: 6px;
            cursor: pointer;
        }

        .node {
            cursor: pointer;
        }

        .node circle {
            stroke: #fff;
            stroke-width: 1.5px;
        }

        .node.expandable circle {
            stroke-dasharray: 3, 2;
            stroke-width: 2.5px;
        }

        .node.selected circle {
            stroke: #00d9ff;
            stroke-width: 3px;
        }

        .node text {
            font-size: 10px;
            fill: #fff;
            pointer-events: none;
        }

        .link.hierarchy {
            stroke: #777;
            stroke-opacity: 0.7;
        }

        .link.sequence {
            stroke: #ffe66d;
            stroke-opacity: 0.5;
            stroke-dasharray: 4, 4;
        }
    </style>
</head>
<body>
    <div id="container">
        <div id="graph"></div>
        <div id="sidebar">
            <h1>Apalysis</h1>
            <div id="model-name"></div>

            <h2>Summary</h2>
            <div class="stat">
                <span>Class</span>
                <span class="stat-value" id="stat-class">-</span>
            </div>
            <div class="stat">
                <span>Parameters</span>
                <span class="stat-value" id="stat-params">-</span>
            </div>
            <div class="stat">
                <span>Layers</span>
                <span class="stat-value" id="stat-layers">-</span>
            </div>
            <div class="stat">
                <span>Visible</span>
                <span class="stat-value" id="stat-visible">-</span>
            </div>

            <h2>Controls</h2>
            <div class="controls">
                <button id="collapse-all">Collapse all</button>
            </div>

            <h2>Legend</h2>
            <div class="legend" id="legend"></div>

            <div id="node-info">
                <h3 id="node-id"></h3>
                <div id="node-fields"></div>
            </div>
        </div>
    </div>

    <script>
        const typeColors = {
            'Linear': '#4ecdc4',
            'Conv': '#ff6b6b',
            'Normalization': '#ffe66d',
            'Dropout': '#a29bfe',
            'Activation': '#95e1d3',
            'Pooling': '#f38181',
            'Reshape': '#fdcb6e',
            'Recurrent': '#e17055',
            'Embedding': '#00b894',
            'Attention': '#fd79a8',
            'Container': '#6c5ce7',
            'Module': '#74b9ff'
        };

        let simulation, svg, g, linkGroup, nodeGroup;
        let nodes = [];
        let links = [];
        let selectedId = null;

        function colorFor(d) {
            return typeColors[d.layerType] || '#74b9ff';
        }

        function radiusFor(d) {
            const base = d.numParameters > 0 ? Math.log10(d.numParameters + 1) * 3 + 6 : 6;
            return Math.min(base, 24) + (d.hasChildren ? 4 : 0);
        }

        async function api(method, path, body) {
            const options = { method };
            if (body !== undefined) {
                options.headers = { 'Content-Type': 'application/json' };
                options.body = JSON.stringify(body);
            }
            const response = await fetch(path, options);
            return { ok: response.ok, data: await response.json() };
        }

        function nodePath(id) {
            return id.split('/').map(encodeURIComponent).join('/');
        }

        async function init() {
            const summary = await api('GET', '/api/model/summary');
            document.getElementById('model-name').textContent = summary.data.name;
            document.getElementById('stat-class').textContent = summary.data.class;
            document.getElementById('stat-params').textContent = summary.data.totalParameters.toLocaleString();
            document.getElementById('stat-layers').textContent = summary.data.totalLayers;

            const legend = document.getElementById('legend');
            Object.entries(typeColors).forEach(([name, color]) => {
                legend.insertAdjacentHTML('beforeend',
                    `<div class="legend-item"><div class="legend-color" style="background: ${color}"></div><span>${name}</span></div>`);
            });

            document.getElementById('collapse-all').addEventListener('click', async () => {
                await api('PUT', '/api/state', { expanded: [] });
                const view = await api('GET', '/api/graph');
                render(view.data);
            });

            createCanvas();
            const view = await api('GET', '/api/graph');
            render(view.data);
        }

        function createCanvas() {
            const container = document.getElementById('graph');
            const width = container.clientWidth;
            const height = container.clientHeight;

            svg = d3.select('#graph')
                .append('svg')
                .attr('width', width)
                .attr('height', height);

            svg.call(d3.zoom()
                .scaleExtent([0.1, 4])
                .on('zoom', (event) => g.attr('transform', event.transform)));

            g = svg.append('g');
            linkGroup = g.append('g');
            nodeGroup = g.append('g');

            simulation = d3.forceSimulation()
                .force('link', d3.forceLink().id(d => d.id).distance(l => l.edgeType === 'hierarchy' ? 80 : 50))
                .force('charge', d3.forceManyBody().strength(-250))
                .force('center', d3.forceCenter(width / 2, height / 2))
                .force('collision', d3.forceCollide().radius(d => radiusFor(d) + 6))
                .on('tick', ticked);
        }

        function render(view) {
            const previous = new Map(nodes.map(n => [n.id, n]));
            nodes = view.nodes.map(n => {
                const old = previous.get(n.id) || (n.parentId && previous.get(n.parentId));
                return old ? Object.assign({}, n, { x: old.x, y: old.y }) : Object.assign({}, n);
            });
            links = view.edges.map(e => Object.assign({}, e));

            document.getElementById('stat-visible').textContent = nodes.length;

            linkGroup.selectAll('line')
                .data(links, d => `${d.source}-${d.target}-${d.edgeType}`)
                .join('line')
                .attr('class', d => `link ${d.edgeType}`);

            const node = nodeGroup.selectAll('.node')
                .data(nodes, d => d.id)
                .join(enter => {
                    const group = enter.append('g').call(d3.drag()
                        .on('start', dragstarted)
                        .on('drag', dragged)
                        .on('end', dragended));
                    group.append('circle');
                    group.append('text').attr('dy', -14).attr('text-anchor', 'middle');
                    group.on('click', (event, d) => onClick(d));
                    return group;
                });

            node.attr('class', d => {
                const classes = ['node'];
                if (d.hasChildren && !d.expanded) classes.push('expandable');
                if (d.id === selectedId) classes.push('selected');
                return classes.join(' ');
            });
            node.select('circle')
                .attr('r', d => radiusFor(d))
                .attr('fill', d => colorFor(d));
            node.select('text').text(d => d.hasChildren ? `${d.label} ${d.expanded ? '−' : '+'}` : d.label);

            simulation.nodes(nodes);
            simulation.force('link').links(links);
            simulation.alpha(0.5).restart();
        }

        async function onClick(d) {
            selectedId = d.id;
            await showNodeInfo(d.id);
            if (d.hasChildren) {
                const view = await api('POST', `/api/toggle/${nodePath(d.id)}`);
                render(view.data);
            } else {
                nodeGroup.selectAll('.node').classed('selected', n => n.id === selectedId);
            }
        }

        async function showNodeInfo(id) {
            const detail = await api('GET', `/api/node/${nodePath(id)}`);
            if (!detail.ok) return;
            const d = detail.data;

            document.getElementById('node-info').classList.add('visible');
            document.getElementById('node-id').textContent = d.id;

            const rows = [
                ['Class', d.moduleClass],
                ['Type', d.layerType],
                ['Parameters', d.numParameters.toLocaleString()],
                ['Children', d.childCount],
                ['Depth', d.depth]
            ];
            Object.entries(d.params).forEach(([key, value]) => rows.push([key, JSON.stringify(value)]));
            if (d.inputShape) rows.push(['Input', JSON.stringify(d.inputShape)]);
            if (d.outputShape) rows.push(['Output', JSON.stringify(d.outputShape)]);

            const fields = document.getElementById('node-fields');
            fields.replaceChildren(...rows.map(([label, value]) => {
                const row = document.createElement('div');
                row.className = 'node-stat';
                const name = document.createElement('span');
                name.textContent = label;
                const text = document.createElement('span');
                text.textContent = value;
                row.append(name, text);
                return row;
            }));
        }

        function ticked() {
            linkGroup.selectAll('line')
                .attr('x1', d => d.source.x)
                .attr('y1', d => d.source.y)
                .attr('x2', d => d.target.x)
                .attr('y2', d => d.target.y);

            nodeGroup.selectAll('.node').attr('transform', d => `translate(${d.x},${d.y})`);
        }

        function dragstarted(event) {
            if (!event.active) simulation.alphaTarget(0.3).restart();
            event.subject.fx = event.subject.x;
            event.subject.fy = event.subject.y;
        }

        function dragged(event) {
            event.subject.fx = event.x;
            event.subject.fy = event.y;
        }

        function dragended(event) {
            if (!event.active) simulation.alphaTarget(0);
            event.subject.fx = null;
            event.subject.fy = null;
        }

        window.addEventListener('resize', () => {
            const container = document.getElementById('graph');
            svg.attr('width', container.clientWidth).attr('height', container.clientHeight);
            simulation.force('center', d3.forceCenter(container.clientWidth / 2, container.clientHeight / 2));
            simulation.alpha(0.3).restart();
        });

        init();
    </script>
</body>
</html>
"#;
