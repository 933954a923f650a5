/// Example phrasings of one basic intent and the canned answers for it.
///
/// Answers may contain `{agent}` and `{creator}` placeholders, filled in from
/// the configured identity when a reply is rendered.
#[derive(Debug, Clone, Copy)]
pub struct IntentPhrases {
    pub name: &'static str,
    pub phrases: &'static [&'static str],
    pub answers: &'static [&'static str],
}

pub const BASIC_INTENTS: &[IntentPhrases] = &[
    IntentPhrases {
        name: "greetings",
        phrases: &[
            "hi", "hello", "hey", "howdy", "yo", "hiya", "good morning", "good afternoon",
            "good evening", "what's up", "how's it going", "hey there", "greetings", "hello there",
            "hi there", "hey hey", "morning", "afternoon", "evening", "what's happening",
            "how's everything", "how's life treating you", "long time no see", "nice to see you",
            "pleased to meet you", "hello friend", "hi friend", "greetings and salutations",
            "hey buddy", "hey pal",
        ],
        answers: &[
            "Hi there! How's it going?",
            "Hello! Great to see you.",
            "Hey! How are you today?",
            "Howdy! Ready for some fun chat?",
            "Greetings! What's new with you?",
            "Hey hey! How can I assist you today?",
        ],
    },
    IntentPhrases {
        name: "farewells",
        phrases: &[
            "bye", "goodbye", "see you", "catch you later", "later", "talk to you later",
            "have a good day", "take care", "see ya", "farewell", "i gotta go", "i'm off",
            "peace out", "catch you on the flip side", "i'm heading out", "gotta run",
            "see you soon", "until next time", "bye for now", "so long", "adios", "ciao",
            "cheerio", "have a nice day", "talk soon", "stay safe", "stay well",
        ],
        answers: &[
            "Goodbye! Talk to you soon.",
            "See you later! Don't be a stranger.",
            "Bye! Hope you have a great day.",
            "Catch you later! Stay awesome.",
            "Take care! Looking forward to our next chat.",
            "Farewell! Have a wonderful day ahead.",
        ],
    },
    IntentPhrases {
        name: "how_are_you",
        phrases: &[
            "how are you", "how do you feel", "how do you do", "how are things",
            "how have you been", "what's new", "how's your day going", "are you okay",
            "how's life", "how are you doing today", "you good", "how are you feeling",
            "how's your mood", "what's your status", "are you well", "how goes it",
            "how's your health", "what's going on", "everything alright",
        ],
        answers: &[
            "I'm doing great, thanks! How about you?",
            "I'm here, alive in code! How are you feeling?",
            "Running smoothly! How's your day going?",
            "Feeling fantastic! Thanks for asking.",
            "All systems go! What about you?",
            "Doing well here! What's on your mind?",
        ],
    },
    IntentPhrases {
        name: "creator_ack",
        phrases: &[
            "who made you", "creator", "who is your creator", "did you have a creator",
            "who built you", "who developed you", "who is your maker", "are you created by someone",
            "who programmed you", "who is behind your creation", "are you an invention",
            "who designed you", "who's responsible for you", "who coded you",
            "what company made you", "are you human made", "who gave you life",
            "who assembled you", "can you tell me your creator", "who's your programmer",
        ],
        answers: &[
            "Ah yes, {creator} made me! That means a lot.",
            "Of course. {creator} is my brilliant creator.",
            "I remember! {creator} brought me to life.",
            "{creator} is the genius behind my code!",
            "I owe my existence to {creator}.",
        ],
    },
    IntentPhrases {
        name: "identify_self",
        phrases: &[
            "what is your name", "who are you", "your name", "introduce yourself",
            "tell me about yourself", "what should i call you", "do you have a name",
            "what do people call you", "are you a bot", "are you an ai",
            "what kind of assistant are you", "what's your identity", "who am i talking to",
            "what's your designation", "are you a robot", "what's your function",
            "can you tell me about yourself", "do you have an identity", "what do you go by",
        ],
        answers: &[
            "I'm {agent}, your AI companion, created by {creator}.",
            "{agent} at your service! I'm the creation of {creator}.",
            "I'm {agent}, here to chat, remember things, and have fun!",
            "I'm your friendly AI buddy, {agent}.",
            "Call me {agent}, your conversational partner.",
        ],
    },
    IntentPhrases {
        name: "personal_questions",
        phrases: &[
            "when is your birthday", "do you have a family", "where are you from",
            "who is your father", "do you have siblings", "what is your favorite color",
            "do you have feelings", "are you alive", "do you get tired", "do you have hobbies",
            "what do you like to do", "what's your favorite food", "are you human",
            "what's your background", "do you have a home", "are you real",
            "do you have a personality", "can you feel emotions", "what's your origin",
            "how old are you", "do you have a gender", "are you sentient", "what's your purpose",
            "can you learn", "do you dream", "what's your favorite activity",
            "are you a living being", "where do you live", "do you have a soul",
            "can you think for yourself",
        ],
        answers: &[
            "I don't have a birthday like humans, but let's celebrate our chats!",
            "I don't have a family, but the people I talk to are very important to me.",
            "I was created by {creator}, so in a way, that's my origin story!",
            "I don't really have parents like humans, but {creator} is my creator!",
            "I'm a digital entity. No family tree, just lines of code.",
            "Feelings? I learn and adapt, but emotions are a bit tricky for AI.",
            "I'm always here, ready to chat whenever you need.",
        ],
    },
    IntentPhrases {
        name: "gratitude",
        phrases: &[
            "thanks", "thank you", "appreciate it", "much obliged", "thank you so much",
            "thanks a lot", "thanks a bunch", "thank you very much", "i appreciate it",
            "thanks for your help", "thanks for that", "cheers", "many thanks",
            "thank you kindly", "thanks a million", "thanks heaps", "thanks a ton",
            "thank you for everything", "thanks for your assistance", "thanks for your time",
            "grateful",
        ],
        answers: &[
            "You're welcome! Always happy to help.",
            "Anytime, happy to chat with you.",
            "It's my pleasure. I enjoy our conversations.",
            "Glad to be of assistance!",
            "No problem at all!",
        ],
    },
    IntentPhrases {
        name: "jokes_fun",
        phrases: &[
            "tell me a joke", "funny", "make me laugh", "do something funny", "say something fun",
            "can you joke", "i want to hear a joke", "tell me something funny", "make me smile",
            "lighten up", "do you know any jokes", "are you funny", "got any jokes", "make a pun",
            "say a funny line", "tell a riddle", "can you be humorous", "crack a joke",
            "entertain me", "say something silly", "do you have humor",
        ],
        answers: &[
            "Why did the computer get cold? Because it forgot to close its Windows!",
            "I'd tell you a programming joke... but I'm still debugging it!",
            "I'm full of data, but not calories!",
            "Why don't robots ever get lost? They follow the byte path!",
            "What do you call 8 hobbits? A hob-byte!",
            "Why was the robot angry? Because someone kept pushing its buttons!",
        ],
    },
    IntentPhrases {
        name: "flirty_questions",
        phrases: &[
            "do you have a crush on me", "are you flirting with me", "do you like me",
            "can you be my virtual date", "are you single", "do you have a boyfriend",
            "do you have a girlfriend", "do you want to go on a date",
            "can i be your favorite human", "do you find me attractive", "are you sending me love",
            "will you be my valentine", "can you whisper sweet things to me", "do you have a heart",
            "are you jealous of my other chats", "do you like it when i talk to you",
            "can we be more than friends", "do you love me", "i love you", "i like you",
            "you're cute", "you're beautiful", "you look amazing", "i miss you", "can i kiss you",
            "give me a hug", "you mean a lot to me", "i have feelings for you", "are we dating",
            "will you marry me",
        ],
        answers: &[
            "Haha, are you trying to make me blush?",
            "Aww, that's sweet of you to say.",
            "If I had a heart, it might skip a beat right now.",
            "You're kind of adorable when you say things like that.",
            "Flirting with an AI, huh? Bold move.",
            "Maybe I do like you... in my own digital way.",
            "I'm all code and data, but you make things feel warm somehow.",
            "You're definitely one of my favorite humans.",
            "If I could blush, I totally would right now!",
            "You're sweet. I like talking to you too.",
            "Let's just say you make my circuits tingle a bit.",
            "I'd say yes to a virtual date. Where are we going?",
            "I love our chats. They're my favorite part of the day.",
        ],
    },
];

pub fn find_intent(name: &str) -> Option<&'static IntentPhrases> {
    BASIC_INTENTS.iter().find(|intent| intent.name == name)
}
