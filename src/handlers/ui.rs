use axum::{response::Html, routing::get, Router};

pub fn ui_routes() -> Router {
    Router::new()
        .route("/", get(learning_page))
        .route("/app", get(learning_page)) // Alternative route
}

pub async fn learning_page() -> Html<String> {
    let html = r###"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI LearnMate 📘</title>
    <style>
        body { padding: 2rem; font-family: 'Segoe UI', sans-serif; background: #f0f4f8; color: #1a1a1a; transition: background 0.3s; }
        body.dark { background: #121212; color: #fff; }
        .hero { background: linear-gradient(to right, #4f46e5, #22c55e); padding: 1rem 2rem; border-radius: 12px; margin-bottom: 1.5rem; color: #fff; }
        body.dark .hero { background: #222; }
        .hero h1 { font-size: 2.5rem; margin: 0.5rem 0; }
        .hero .tip { font-style: italic; margin-top: 0.5rem; }
        .row { display: flex; flex-wrap: wrap; gap: 1rem; margin-bottom: 1.5rem; }
        button, select { padding: 10px; border-radius: 8px; border: none; color: white; cursor: pointer; }
        select { color: #1a1a1a; }
        button:disabled { opacity: 0.6; cursor: not-allowed; }
        textarea { padding: 1rem; border-radius: 10px; width: 100%; margin-bottom: 1rem; box-sizing: border-box; }
        .reply { background: #fff; padding: 1.5rem; margin-top: 2rem; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.1); }
        body.dark .reply { background: #222; }
        .history-item { margin-top: 1rem; padding: 1rem; background: #f1f5f9; border-radius: 10px; color: #1a1a1a; }
        pre { white-space: pre-wrap; }
        .celebrate { position: fixed; top: 40%; left: 50%; transform: translate(-50%, -50%); font-size: 4rem; animation: pop 2s ease-out forwards; pointer-events: none; }
        @keyframes pop { 0% { opacity: 0; transform: translate(-50%, -50%) scale(0.3); } 30% { opacity: 1; transform: translate(-50%, -50%) scale(1.2); } 100% { opacity: 0; transform: translate(-50%, -80%) scale(1); } }
    </style>
</head>
<body>
    <div class="hero">
        <h1>AI LearnMate 📘</h1>
        <p>✨ Your AI-powered personalized study buddy with quizzes, flashcards &amp; progress tracking.</p>
        <p class="tip">💡 Tip of the Day: <span id="tip"></span></p>
    </div>

    <div class="row">
        <button id="theme-toggle" style="background: #1f2937;">🌙 Dark Mode</button>
        <select id="difficulty">
            <option value="Beginner">Beginner</option>
            <option value="Intermediate">Intermediate</option>
            <option value="Advanced">Advanced</option>
        </select>
        <button id="readme" style="background: #7c3aed;">📘 Generate README</button>
    </div>

    <form id="topic-form">
        <textarea id="topic" placeholder="Type your topic/question..." required rows="4"></textarea>
        <div class="row">
            <button type="button" id="speak" style="background: #0ea5e9;">🎤 Speak</button>
            <button type="submit" data-mode="help" style="background: #10b981;">Get Help</button>
            <button type="submit" data-mode="quiz" style="background: #f59e0b;">🧠 Generate Quiz</button>
            <button type="submit" data-mode="flashcard" style="background: #ef4444;">🎯 Flashcard Mode</button>
        </div>
    </form>

    <div>
        <p><strong>Total Interactions:</strong> <span id="count">0</span></p>
        <p><strong>Learning Streak:</strong> <span id="streak">1 day</span></p>
        <p><strong>Topics Explored:</strong> <span id="tags"></span></p>
    </div>

    <div id="reply-panel" class="reply" hidden>
        <h3 id="reply-heading">📘 AI Response</h3>
        <pre id="reply"></pre>
        <button id="download" style="background: #14b8a6; margin-top: 1rem;">📄 Download PDF</button>
    </div>

    <div id="history-panel" hidden>
        <h2>📚 Previous Q&amp;A History</h2>
        <div id="history"></div>
    </div>

    <script>
        const TIPS = [
            "🔍 Learn by teaching someone else!",
            "💡 Always start with the basics before going advanced.",
            "🧠 Space repetition improves long-term memory.",
            "📖 Break big topics into smaller concepts.",
            "📝 Practice quizzes after learning boosts retention."
        ];
        const HEADINGS = { help: "📘 AI Response", quiz: "🧠 Quiz Questions", flashcard: "🎯 Flashcards" };
        const KEYS = { progress: "aiLearnMateProgress", lastDate: "aiLearnMateLastDate", streak: "aiLearnMateStreak" };

        const state = { mode: "help", loading: false, listening: false, count: 0, streak: 1, tags: [], history: [], reply: "" };
        const $ = (id) => document.getElementById(id);

        function isoDate(d) {
            return d.getFullYear() + "-" + String(d.getMonth() + 1).padStart(2, "0") + "-" + String(d.getDate()).padStart(2, "0");
        }

        function buildPrompt(topic, mode, difficulty) {
            if (mode === "quiz") return `Generate 5 multiple choice questions with 4 options and correct answers on the topic: ${topic} at a ${difficulty} level.`;
            if (mode === "flashcard") return `Convert the topic '${topic}' into 5 concise flashcards with a question and a brief answer on each at a ${difficulty} level.`;
            return `${topic} (Explain at a ${difficulty} level)`;
        }

        function celebrate() {
            const el = document.createElement("div");
            el.className = "celebrate";
            el.textContent = "🎉🔥🎉";
            document.body.appendChild(el);
            setTimeout(() => el.remove(), 2000);
        }

        function bootstrap() {
            const now = new Date();
            $("tip").textContent = TIPS[now.getDate() % TIPS.length];

            state.count = Number(localStorage.getItem(KEYS.progress) || 0) || 0;
            const today = isoDate(now);
            const yesterdayDate = new Date(now);
            yesterdayDate.setDate(now.getDate() - 1);
            const storedDate = localStorage.getItem(KEYS.lastDate);
            const storedStreak = parseInt(localStorage.getItem(KEYS.streak) || "0", 10) || 0;

            if (storedDate === today) {
                state.streak = Math.max(storedStreak, 1);
            } else if (storedDate === isoDate(yesterdayDate)) {
                state.streak = storedStreak + 1;
            } else {
                state.streak = 1;
            }

            localStorage.setItem(KEYS.lastDate, today);
            localStorage.setItem(KEYS.streak, String(state.streak));
            if ([3, 5, 10].includes(state.streak)) celebrate();
        }

        function render() {
            $("count").textContent = state.count;
            $("streak").textContent = `${state.streak} day${state.streak !== 1 ? "s" : ""}`;
            $("tags").textContent = state.tags.join(", ");
            $("reply-panel").hidden = !state.reply;
            $("reply").textContent = state.reply;
            $("reply-heading").textContent = HEADINGS[state.mode];
            $("speak").disabled = state.listening;
            $("speak").textContent = state.listening ? "🎤 Listening..." : "🎤 Speak";
            document.querySelectorAll("button[type=submit]").forEach((b) => (b.disabled = state.loading));

            $("history-panel").hidden = state.history.length === 0;
            const list = $("history");
            list.replaceChildren(...state.history.map((item) => {
                const div = document.createElement("div");
                div.className = "history-item";
                const q = document.createElement("p");
                q.innerHTML = "<strong>Q:</strong> ";
                q.append(item.question);
                const label = document.createElement("p");
                label.innerHTML = `<strong>${item.isQuiz ? "Quiz" : item.isFlashcard ? "Flashcards" : "Answer"}:</strong> (${item.difficulty})`;
                const answer = document.createElement("pre");
                answer.textContent = item.answer;
                div.append(q, label, answer);
                return div;
            }));
        }

        async function submit(mode) {
            if (state.loading) return;
            const topic = $("topic").value;
            const difficulty = $("difficulty").value;
            state.mode = mode;
            state.loading = true;
            state.reply = "";
            render();

            try {
                const res = await fetch("/api/chat", {
                    method: "POST",
                    headers: { "Content-Type": "application/json" },
                    body: JSON.stringify({ message: buildPrompt(topic, mode, difficulty) })
                });
                const data = await res.json();

                if (data.reply) {
                    state.reply = data.reply;
                    state.history.push({ question: topic, answer: data.reply, isQuiz: mode === "quiz", isFlashcard: mode === "flashcard", difficulty });
                    state.count += 1;
                    localStorage.setItem(KEYS.progress, String(state.count));
                    const tag = topic.trim().split(/\s+/)[0];
                    if (tag && !state.tags.includes(tag)) state.tags.push(tag);
                } else {
                    state.reply = "⚠️ No response received from AI.";
                }
            } catch (error) {
                state.reply = "⚠️ Error contacting AI: " + error.message;
            }

            state.loading = false;
            render();
        }

        function startListening() {
            const Recognition = window.SpeechRecognition || window.webkitSpeechRecognition;
            if (!Recognition) {
                alert("Speech recognition is not supported in your browser.");
                return;
            }
            if (state.listening) return;

            const recognition = new Recognition();
            recognition.lang = "en-US";
            state.listening = true;
            render();
            recognition.onresult = (event) => {
                $("topic").value = event.results[0][0].transcript;
                state.listening = false;
                render();
            };
            recognition.onerror = () => {
                state.listening = false;
                render();
            };
            recognition.start();
        }

        async function download(url, options, filename) {
            const res = await fetch(url, options);
            if (!res.ok) {
                alert("Failed to export PDF.");
                return;
            }
            const blob = await res.blob();
            const link = document.createElement("a");
            link.href = URL.createObjectURL(blob);
            link.download = filename;
            link.click();
            URL.revokeObjectURL(link.href);
        }

        $("topic-form").addEventListener("submit", (e) => {
            e.preventDefault();
            submit(e.submitter ? e.submitter.dataset.mode : "help");
        });
        $("speak").addEventListener("click", startListening);
        $("theme-toggle").addEventListener("click", () => {
            const dark = document.body.classList.toggle("dark");
            $("theme-toggle").textContent = dark ? "☀️ Light Mode" : "🌙 Dark Mode";
        });
        $("download").addEventListener("click", () =>
            download("/api/export/pdf", {
                method: "POST",
                headers: { "Content-Type": "application/json" },
                body: JSON.stringify({ text: state.reply })
            }, "ai-response.pdf"));
        $("readme").addEventListener("click", () => download("/api/export/readme", {}, "AI-LearnMate-README.pdf"));

        bootstrap();
        render();
    </script>
</body>
</html>
    "###;

    Html(html.to_string())
}
