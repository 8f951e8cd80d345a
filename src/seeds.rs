//! Built-in stanzas that keep the trainer usable without a corpus file.

pub fn default_poems() -> Vec<String> {
  vec![
    "Мороз и солнце; день чудесный!\n\
     Еще ты дремлешь, друг прелестный —\n\
     Пора, красавица, проснись:\n\
     Открой сомкнуты негой взоры."
      .into(),
    "Под голубыми небесами\n\
     Великолепными коврами,\n\
     Блестя на солнце, снег лежит;\n\
     Прозрачный лес один чернеет,\n\
     И ель сквозь иней зеленеет,\n\
     И речка подо льдом блестит."
      .into(),
  ]
}
